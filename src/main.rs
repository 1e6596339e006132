use chess_rules::shell::Shell;

fn main() -> anyhow::Result<()> {
    let mut shell = Shell::new();
    shell.run()
}
