#[macro_use] extern crate lazy_static;

pub mod align;
pub mod dedupe;
pub mod graph;
pub mod join;
pub mod proj;
pub mod resolve;
pub mod stream;
pub mod text;
pub mod types;

pub use types::{Context, Street, DirectoryRecord, Vocabulary};

///
/// Parse an optional numeric CLI argument
///
pub(crate) fn arg<T>(args: &clap_v3::ArgMatches, name: &str) -> Result<Option<T>, String>
    where T: std::str::FromStr,
          T::Err: std::fmt::Display
{
    match args.value_of(name) {
        None => Ok(None),
        Some(value) => match value.parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(err) => Err(format!("Invalid --{} {}: {}", name, value, err))
        }
    }
}

///
/// Worker pool size from --threads, or every available core
///
pub(crate) fn threads(args: &clap_v3::ArgMatches) -> Result<usize, String> {
    match arg::<usize>(args, "threads")? {
        Some(threads) => Ok(threads),
        None => Ok(std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
    }
}
