pub mod filesystem;
pub mod hasher;
pub mod notify;
pub mod output;
pub mod progress;
pub mod selection;

pub use filesystem::FileSystemAdapter;
pub use hasher::StreamingHasher;
pub use notify::TerminalNotifier;
pub use output::{ConsoleOutputAdapter, JsonOutputAdapter};
pub use progress::{ChannelProgressAdapter, ProgressBarAdapter};
pub use selection::InteractiveSelectionAdapter;
