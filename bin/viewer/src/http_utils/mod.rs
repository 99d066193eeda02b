pub mod probes;
pub mod shell;
