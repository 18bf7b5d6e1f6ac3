mod common;
mod scorer;
mod suggestions;
