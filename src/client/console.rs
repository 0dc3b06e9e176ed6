//! Terminal front end: each input line is one UI event on a [`ConsolePage`].

use std::{
    fmt,
    io::{self, BufRead, Write},
    str::FromStr,
};

use log::{debug, error};
use thiserror::Error;

use crate::models::servers::{ManagedServer, PanelServerList};

use super::{
    actions::PanelActions,
    gateway::Transport,
    page::{ids, BanRow, FormState, PanelPage},
};

const HELP: &str = "\
login <username> <password>
ban <identifier> [until=YYYY-MM-DD] [reason...]
search <identifier>
unban <ban id>
kick <server uid> <player uid>...
servers
help
quit";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command <{0}>, try `help`")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("<{0}> is not a ban id")]
    BanId(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login {
        username: String,
        password: String,
    },
    Ban {
        identifier: String,
        until: Option<String>,
        reason: String,
    },
    Search {
        identifier: String,
    },
    Unban {
        ban_id: i32,
    },
    Kick {
        server_uid: String,
        player_uids: Vec<String>,
    },
    Servers,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = match words.next() {
            Some(name) => name.to_ascii_lowercase(),
            None => return Ok(Command::Help),
        };

        let command = match name.as_str() {
            "login" => match (words.next(), words.next()) {
                (Some(username), Some(password)) => Command::Login {
                    username: username.to_string(),
                    password: password.to_string(),
                },
                _ => return Err(CommandError::Usage("login <username> <password>")),
            },
            "ban" => {
                let identifier = words
                    .next()
                    .ok_or(CommandError::Usage(
                        "ban <identifier> [until=YYYY-MM-DD] [reason...]",
                    ))?
                    .to_string();
                let mut rest: Vec<&str> = words.collect();
                let until = match rest.first() {
                    Some(word) if word.starts_with("until=") => {
                        let until = word.trim_start_matches("until=").to_string();
                        rest.remove(0);
                        Some(until)
                    }
                    _ => None,
                };
                Command::Ban {
                    identifier,
                    until,
                    reason: rest.join(" "),
                }
            }
            "search" => Command::Search {
                identifier: words
                    .next()
                    .ok_or(CommandError::Usage("search <identifier>"))?
                    .to_string(),
            },
            "unban" => {
                let ban_id = words.next().ok_or(CommandError::Usage("unban <ban id>"))?;
                Command::Unban {
                    ban_id: ban_id
                        .parse()
                        .map_err(|_| CommandError::BanId(ban_id.to_string()))?,
                }
            }
            "kick" => Command::Kick {
                server_uid: words
                    .next()
                    .ok_or(CommandError::Usage("kick <server uid> <player uid>..."))?
                    .to_string(),
                player_uids: words.map(str::to_string).collect(),
            },
            "servers" => Command::Servers,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(name)),
        };
        Ok(command)
    }
}

/// A [`PanelPage`] drawn on a terminal. Confirmations are read from `input`.
pub struct ConsolePage<R, W> {
    state: FormState,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePage<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            state: FormState::default(),
            input,
            output,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end().to_string()))
    }

    fn print_server(&mut self, managed: &ManagedServer) {
        let server = &managed.server;
        self.print(format_args!(
            "  {} | {} | {} | {} | {}/{} | [{}]:{}\n",
            managed.uid,
            server.name,
            server.map,
            server.playlist,
            server.player_count,
            server.max_players,
            server.ip,
            server.port
        ));
        if let Some(token) = &managed.token {
            self.print(format_args!("    token: {}\n", token));
        }
        let players: Vec<String> = managed
            .players
            .iter()
            .map(|player| match player.uid {
                Some(uid) => uid.to_string(),
                None => "?".to_string(),
            })
            .collect();
        self.print(format_args!("    players: {}\n", players.join(" ")));
    }

    fn print(&mut self, args: fmt::Arguments) {
        if let Err(e) = self
            .output
            .write_fmt(args)
            .and_then(|_| self.output.flush())
        {
            error!("Couldn't write to the console: {}", &e);
        }
    }
}

impl<R: BufRead, W: Write> PanelPage for ConsolePage<R, W> {
    fn input_value(&self, id: &str) -> String {
        self.state.input_value(id)
    }

    fn inputs_by_name(&self, name: &str) -> Vec<String> {
        self.state.inputs_by_name(name)
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.print(format_args!("{} [y/N] ", message));
        let answer = match self.read_line() {
            Ok(Some(answer)) => answer,
            Ok(None) => return false,
            Err(e) => {
                error!("Couldn't read confirmation: {}", &e);
                return false;
            }
        };
        answer.trim().eq_ignore_ascii_case("y") || answer.trim().eq_ignore_ascii_case("yes")
    }

    fn set_text(&mut self, id: &str, text: &str) {
        self.state.set_text(id, text);
        self.print(format_args!("{}\n", text));
    }

    fn replace_rows(&mut self, table_id: &str, rows: Vec<BanRow>) {
        if rows.is_empty() {
            self.print(format_args!("No bans found\n"));
        } else {
            self.print(format_args!(
                "{:>6} | {:<24} | {:<23} | {:<23} | {}\n",
                "Ban ID", "Identifier", "Banned On", "Unban Date", "Reason"
            ));
            for row in &rows {
                let [identifier, banned_on, unban_date, reason] = &row.cells;
                self.print(format_args!(
                    "{:>6} | {:<24} | {:<23} | {:<23} | {}\n",
                    row.ban_id, identifier, banned_on, unban_date, reason
                ));
            }
        }
        self.state.replace_rows(table_id, rows);
    }

    fn show_servers(&mut self, list_id: &str, servers: PanelServerList) {
        let groups = [
            ("Public servers", &servers.public),
            ("Hidden servers", &servers.hidden),
        ];
        for (title, group) in groups {
            self.print(format_args!("{} ({})\n", title, group.len()));
            for managed in group {
                self.print_server(managed);
            }
        }
        self.state.show_servers(list_id, servers);
    }
}

/// Reads commands until `quit` or end of input.
pub async fn run<T, R, W>(actions: &PanelActions<T>, page: &mut ConsolePage<R, W>) -> io::Result<()>
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    page.print(format_args!(
        "Panel at {}, type `help` for commands\n",
        actions.gateway().origin()
    ));
    loop {
        page.print(format_args!("> "));
        let line = match page.read_line()? {
            Some(line) => line,
            None => return Ok(()),
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                page.print(format_args!("{}\n", e));
                continue;
            }
        };
        debug!("Console command: {:?}", &command);

        match command {
            Command::Login { username, password } => {
                let state = page.state_mut();
                state.set_input(ids::USERNAME, username);
                state.set_input(ids::PASSWORD, password);
                actions.login(page).await;
            }
            Command::Ban {
                identifier,
                until,
                reason,
            } => {
                let state = page.state_mut();
                state.set_input(ids::BAN_IDENTIFIER, identifier);
                state.set_input(ids::BAN_UNBAN_DATE, until.unwrap_or_default());
                state.set_input(ids::BAN_REASON, reason);
                actions.ban(page).await;
            }
            Command::Search { identifier } => {
                page.state_mut().set_input(ids::SEARCH_IDENTIFIER, identifier);
                actions.check_identifier(page).await;
            }
            Command::Unban { ban_id } => actions.unban(page, ban_id).await,
            Command::Kick {
                server_uid,
                player_uids,
            } => {
                page.state_mut()
                    .set_named_inputs(ids::PLAYERS_TO_KICK, player_uids);
                actions.kick(page, &server_uid).await;
            }
            Command::Servers => actions.list_servers(page).await,
            Command::Help => page.print(format_args!("{}\n", HELP)),
            Command::Quit => return Ok(()),
        }
    }
}
