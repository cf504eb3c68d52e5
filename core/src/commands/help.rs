#[must_use]
pub fn help_text(command: Option<&str>) -> String {
    match command {
        Some("status") | Some("st") => {
            "status\n  Show wallet, network, and token state.\n  Alias: st".to_string()
        }
        Some("detect") => {
            "detect\n  Check whether a wallet provider is available.".to_string()
        }
        Some("connect") | Some("conn") => {
            "connect\n  Ask the wallet to authorize an account.\n  Alias: conn".to_string()
        }
        Some("network") | Some("net") => {
            "network\n  Check the wallet's chain against the required chain.\n  Token info is loaded when the chain matches.\n  Alias: net".to_string()
        }
        Some("switch") => {
            "switch <network>\n  Ask the wallet to switch to a configured network.\n  Use 'networks' to list names.\n  Example: switch sepolia".to_string()
        }
        Some("token") | Some("info") => {
            "token\n  Reload token name, symbol, and balance from the contract.\n  Alias: info".to_string()
        }
        Some("balance") | Some("bal") => {
            "balance\n  Reload the token balance for the connected account.\n  Alias: bal".to_string()
        }
        Some("watch") => {
            "watch [seconds] [max_checks]\n  Poll the token balance in the background.\n  Default: every 2 seconds, at most 60 checks.\n  Starting a new watch replaces the running one.\n  Example: watch 5 12".to_string()
        }
        Some("unwatch") | Some("stop") => {
            "unwatch\n  Stop balance polling.\n  Alias: stop".to_string()
        }
        Some("submit") => {
            "submit <answer> [answer...]\n  Submit survey answers to the contract through the wallet.\n  Answers are unsigned integers, separated by spaces or commas.\n  Example: submit 1 3 2".to_string()
        }
        Some("networks") => {
            "networks\n  List configured networks. '*' marks the required one.".to_string()
        }
        Some("exit") | Some("quit") | Some("q") => {
            "exit\n  Exit the session.\n  Aliases: quit, q".to_string()
        }
        Some(other) => format!("Unknown command '{other}'. Type 'help' for a list of commands."),
        None => [
            "Commands:",
            "  status                       Show session state",
            "  detect                       Check for a wallet provider",
            "  connect                      Authorize an account",
            "  network                      Check the wallet's chain",
            "  switch <network>             Switch the wallet's chain",
            "  token                        Reload token info",
            "  balance                      Reload token balance",
            "  watch [secs] [max_checks]    Poll the balance",
            "  unwatch                      Stop polling",
            "  submit <answer...>           Submit survey answers",
            "  networks                     List networks",
            "  help [command]               Show help",
            "  exit                         Exit",
        ]
        .join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_help_lists_every_command() {
        let text = help_text(None);
        for cmd in [
            "status", "detect", "connect", "network", "switch", "token", "balance", "watch",
            "unwatch", "submit", "networks", "help", "exit",
        ] {
            assert!(text.contains(cmd), "help should mention {cmd}");
        }
    }

    #[test]
    fn aliases_share_help() {
        assert_eq!(help_text(Some("bal")), help_text(Some("balance")));
        assert!(help_text(Some("nope")).contains("Unknown command"));
    }
}
