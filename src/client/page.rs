use std::collections::HashMap;

use crate::models::servers::PanelServerList;

/// Element ids and input names the actions read from and write to.
pub mod ids {
    pub const BAN_IDENTIFIER: &str = "ban_identifier";
    pub const BAN_REASON: &str = "ban_reason";
    pub const BAN_UNBAN_DATE: &str = "ban_unbandate";
    pub const BAN_RESULT: &str = "ban_result";
    pub const SEARCH_IDENTIFIER: &str = "identifier";
    pub const BAN_TABLE: &str = "ban_list_table_body";
    pub const PLAYERS_TO_KICK: &str = "players_to_kick";
    pub const KICK_MESSAGE: &str = "kick_message";
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const LOGIN_MESSAGE: &str = "login_message";
    pub const SERVER_LIST: &str = "server_list";
    pub const SERVER_LIST_MESSAGE: &str = "server_list_message";
}

/// A rendered ban search row: identifier, banned on, unban date, reason, plus the
/// ban id its Unban control acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRow {
    pub cells: [String; 4],
    pub ban_id: i32,
}

/// What the UI actions need from the page hosting them.
pub trait PanelPage {
    /// Current value of the input with this id; empty when there is no such input.
    fn input_value(&self, id: &str) -> String;

    /// Values of every input carrying this name, in page order.
    fn inputs_by_name(&self, name: &str) -> Vec<String>;

    fn confirm(&mut self, message: &str) -> bool;

    fn set_text(&mut self, id: &str, text: &str);

    /// Replaces every row of the table body with this id.
    fn replace_rows(&mut self, table_id: &str, rows: Vec<BanRow>);

    fn show_servers(&mut self, list_id: &str, servers: PanelServerList);
}

/// Page state kept in memory. `confirm` answers with `confirm_answer`.
#[derive(Debug, Clone)]
pub struct FormState {
    pub inputs: HashMap<String, String>,
    pub named_inputs: HashMap<String, Vec<String>>,
    pub texts: HashMap<String, String>,
    pub tables: HashMap<String, Vec<BanRow>>,
    pub server_lists: HashMap<String, PanelServerList>,
    pub confirm_answer: bool,
    pub confirmations: Vec<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            inputs: HashMap::new(),
            named_inputs: HashMap::new(),
            texts: HashMap::new(),
            tables: HashMap::new(),
            server_lists: HashMap::new(),
            confirm_answer: true,
            confirmations: Vec::new(),
        }
    }
}

impl FormState {
    pub fn set_input(&mut self, id: &str, value: impl Into<String>) {
        self.inputs.insert(id.to_string(), value.into());
    }

    pub fn set_named_inputs(&mut self, name: &str, values: Vec<String>) {
        self.named_inputs.insert(name.to_string(), values);
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.texts.get(id).map(String::as_str)
    }

    pub fn rows(&self, table_id: &str) -> &[BanRow] {
        self.tables.get(table_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn servers(&self, list_id: &str) -> Option<&PanelServerList> {
        self.server_lists.get(list_id)
    }
}

impl PanelPage for FormState {
    fn input_value(&self, id: &str) -> String {
        self.inputs.get(id).cloned().unwrap_or_default()
    }

    fn inputs_by_name(&self, name: &str) -> Vec<String> {
        self.named_inputs.get(name).cloned().unwrap_or_default()
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirmations.push(message.to_string());
        self.confirm_answer
    }

    fn set_text(&mut self, id: &str, text: &str) {
        self.texts.insert(id.to_string(), text.to_string());
    }

    fn replace_rows(&mut self, table_id: &str, rows: Vec<BanRow>) {
        self.tables.insert(table_id.to_string(), rows);
    }

    fn show_servers(&mut self, list_id: &str, servers: PanelServerList) {
        self.server_lists.insert(list_id.to_string(), servers);
    }
}
