/// REPL shell: Reedline-based interactive wallet session.
use crate::Cli;
use anyhow::Result;
use reedline::{DefaultCompleter, DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use survey_wallet_core::commands::Command;
use survey_wallet_core::session::WalletSession;
use survey_wallet_core::SessionState;

pub async fn run_repl(cli: &Cli, session: &WalletSession) -> Result<()> {
    println!("Survey Wallet v{}", env!("CARGO_PKG_VERSION"));
    let config = session.config();
    match config.required_network_name() {
        Some(name) => println!("Required network: {name} (chain {})", config.required_chain_id),
        None => println!("Required network: chain {}", config.required_chain_id),
    }
    println!("Contract: {}", config.contract_address);
    if !session.state().wallet_installed {
        println!("No wallet detected. Pass --rpc-url to attach one.");
    }
    println!("Type 'help' for a list of commands.");
    println!();

    let commands: Vec<String> = vec![
        "status".into(),
        "st".into(),
        "detect".into(),
        "connect".into(),
        "conn".into(),
        "network".into(),
        "net".into(),
        "switch".into(),
        "networks".into(),
        "token".into(),
        "info".into(),
        "balance".into(),
        "bal".into(),
        "watch".into(),
        "unwatch".into(),
        "stop".into(),
        "submit".into(),
        "help".into(),
        "exit".into(),
        "quit".into(),
        "q".into(),
    ];
    let completer = Box::new(DefaultCompleter::new(commands));
    let mut line_editor = Reedline::create().with_completer(completer);

    loop {
        let prompt = build_prompt(&session.state());
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match Command::parse(line) {
                    Ok(Command::Exit) => {
                        println!("Goodbye.");
                        break;
                    }
                    Ok(cmd) => {
                        if let Some(prompt_msg) = cmd.confirmation_prompt(&session.state()) {
                            if !cli.yes && !prompt_confirm(&prompt_msg) {
                                println!("Cancelled.");
                                continue;
                            }
                        }
                        match cmd.execute(session, cli.json).await {
                            Ok(output) => {
                                if !output.is_empty() {
                                    println!("{output}");
                                }
                            }
                            Err(e) => {
                                eprintln!("Error: {e}");
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("{e}");
                    }
                }
            }
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                println!("Goodbye.");
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        }
    }

    session.stop_balance_polling();
    Ok(())
}

fn build_prompt(state: &SessionState) -> DefaultPrompt {
    let label = match state.wallet_address {
        Some(address) => {
            let hex = address.to_string();
            format!("[survey {}..{}]", &hex[..6], &hex[hex.len() - 4..])
        }
        None => "[survey]".to_string(),
    };
    DefaultPrompt::new(
        DefaultPromptSegment::Basic(label),
        DefaultPromptSegment::Empty,
    )
}

fn prompt_confirm(prompt: &str) -> bool {
    use std::io::Write;
    print!("{prompt} [y/N]: ");
    std::io::stdout().flush().ok();
    let mut input = String::new();
    std::io::stdin().read_line(&mut input).is_ok() && input.trim().eq_ignore_ascii_case("y")
}
