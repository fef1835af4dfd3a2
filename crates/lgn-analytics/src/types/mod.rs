mod call_graph;
mod call_tree;
mod log_entry;
mod metric;
mod process_instance;
mod scope;
mod span;

pub use call_graph::*;
pub use call_tree::*;
pub use log_entry::*;
pub use metric::*;
pub use process_instance::*;
pub use scope::*;
pub use span::*;
