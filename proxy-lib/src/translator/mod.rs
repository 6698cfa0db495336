mod decode;
mod encode;
mod error;
mod translator_main;

pub use error::TranslateError;
pub use translator_main::Translator;
