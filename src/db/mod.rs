pub mod models;
pub mod store;

pub use models::{NewSnippet, Parameter, ParameterRecord, Snippet, SnippetPatch, SnippetRecord};
pub use store::Store;
