use minish::Interpreter;

fn main() -> anyhow::Result<()> {
    Interpreter::default().repl()
}
