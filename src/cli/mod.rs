// Command-line definition for `setup-dcm`.
pub mod cmd_enums;
