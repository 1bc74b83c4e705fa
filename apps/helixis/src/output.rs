use console::style;
use serde::Serialize;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_error(error: &anyhow::Error) {
    eprintln!("{} {error:#}", style("Error:").for_stderr().red().bold());
}
