mod change;

pub use change::ChangeCommands;
