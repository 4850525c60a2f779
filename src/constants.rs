pub const DEFAULT_COMMAND_PREFIX: &str = "vim-motions";
pub const DEFAULT_CONFIG_FILE: &str = "vim-motions.toml";
pub const DEFAULT_LOG_FILE: &str = "/tmp/vim-motions.log";

pub mod input_box {
    pub const PROMPT: &str = "Enter a vim motion";
    pub const PLACEHOLDER: &str = "For example: 10j";
}

pub mod messages {
    pub const NO_ACTIVE_EDITOR: &str = "No active editor";
    pub const SELECTION_NOT_EMPTY: &str = "Vim motions do not work with an active selection";
}
