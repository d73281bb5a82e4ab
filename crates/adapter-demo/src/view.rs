//! Text rendering of the app state and parsing of typed commands.

use std::fmt;

use sol_tx::Pubkey;

use crate::app::Action;

pub const USAGE: &str = "\
commands:
  connect              connect to the URL-based wallet
  connect-injected     connect to the injected wallet
  provider <url>       change the wallet provider URL
  send                 submit the demo transaction
  sign                 sign the proof-of-ownership message
  disconnect           disconnect the active wallet
  help                 show this list
  quit                 exit";

const DIVIDER: &str = "----------------------------------------";

/// Everything the screen shows.
#[derive(Debug, Clone, Copy)]
pub struct ViewState<'a> {
    pub network: &'a str,
    pub provider_url: &'a str,
    /// Set only while the active wallet has reported a connect.
    pub connected_as: Option<Pubkey>,
    pub logs: &'a [String],
}

impl fmt::Display for ViewState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Wallet Adapter Demo")?;
        writeln!(f, "Network: {}", self.network)?;
        writeln!(f, "Wallet provider: {}", self.provider_url)?;

        match self.connected_as {
            Some(address) => {
                writeln!(f, "Wallet address: {address}.")?;
                writeln!(f, "[send] Send Transaction")?;
                writeln!(f, "[sign] Sign Message")?;
                writeln!(f, "[disconnect] Disconnect")?;
            }
            None => {
                writeln!(f, "[connect] Connect to Wallet")?;
                writeln!(f, "[connect-injected] Connect to Injected Wallet")?;
            }
        }

        writeln!(f, "{DIVIDER}")?;
        for line in self.logs {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

pub fn render(state: &ViewState<'_>) -> String {
    state.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Action(Action),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match (word, rest) {
        ("", _) => Command::Empty,
        ("connect", "") => Command::Action(Action::ConnectUrlWallet),
        ("connect-injected", "") => Command::Action(Action::ConnectInjectedWallet),
        ("provider", url) if !url.is_empty() => {
            Command::Action(Action::SetProviderUrl(url.to_string()))
        }
        ("send", "") => Command::Action(Action::SendTransaction),
        ("sign", "") => Command::Action(Action::SignMessage),
        ("disconnect", "") => Command::Action(Action::Disconnect),
        ("help", "") => Command::Help,
        ("quit" | "exit", "") => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state<'a>(connected_as: Option<Pubkey>, logs: &'a [String]) -> ViewState<'a> {
        ViewState {
            network: "https://api.mainnet-beta.solana.com",
            provider_url: "https://www.sollet.io",
            connected_as,
            logs,
        }
    }

    #[test]
    fn disconnected_branch_offers_connect_actions_only() {
        let text = render(&state(None, &[]));
        assert!(text.contains("Network: https://api.mainnet-beta.solana.com"));
        assert!(text.contains("Wallet provider: https://www.sollet.io"));
        assert!(text.contains("Connect to Wallet"));
        assert!(text.contains("Connect to Injected Wallet"));
        assert!(!text.contains("Send Transaction"));
        assert!(!text.contains("Wallet address"));
    }

    #[test]
    fn connected_branch_shows_address_and_actions() {
        let key = Pubkey::new([3u8; 32]);
        let text = render(&state(Some(key), &[]));
        assert!(text.contains(&format!("Wallet address: {key}.")));
        assert!(text.contains("Send Transaction"));
        assert!(text.contains("Sign Message"));
        assert!(text.contains("Disconnect"));
        assert!(!text.contains("Connect to Wallet"));
    }

    #[test]
    fn logs_render_below_divider_in_order() {
        let logs = vec!["one".to_string(), "two".to_string()];
        let text = render(&state(None, &logs));
        let tail: Vec<&str> = text
            .lines()
            .skip_while(|l| *l != DIVIDER)
            .skip(1)
            .collect();
        assert_eq!(tail, vec!["one", "two"]);
    }

    #[test]
    fn display_is_the_rendered_screen() {
        let logs = vec!["Connected to wallet x".to_string()];
        let view = state(None, &logs);
        assert_eq!(format!("{view}"), render(&view));
        assert!(render(&view).ends_with("Connected to wallet x\n"));
    }

    #[test]
    fn parses_known_commands() {
        assert_eq!(
            parse_command("connect"),
            Command::Action(Action::ConnectUrlWallet)
        );
        assert_eq!(
            parse_command("  connect-injected "),
            Command::Action(Action::ConnectInjectedWallet)
        );
        assert_eq!(
            parse_command("provider   https://example.com/wallet  "),
            Command::Action(Action::SetProviderUrl("https://example.com/wallet".into()))
        );
        assert_eq!(parse_command("send"), Command::Action(Action::SendTransaction));
        assert_eq!(parse_command("sign"), Command::Action(Action::SignMessage));
        assert_eq!(parse_command("disconnect"), Command::Action(Action::Disconnect));
        assert_eq!(parse_command("help"), Command::Help);
        assert_eq!(parse_command("quit"), Command::Quit);
        assert_eq!(parse_command("   "), Command::Empty);
    }

    #[test]
    fn rejects_malformed_commands() {
        assert_eq!(parse_command("provider"), Command::Unknown("provider".into()));
        assert_eq!(parse_command("send now"), Command::Unknown("send now".into()));
        assert_eq!(parse_command("launch"), Command::Unknown("launch".into()));
    }
}
