use anyhow::Result;
use disclink_core::{Config, PageIdentifierResolver};

use crate::output::json::{IdentifyOutput, print_json};
use crate::output::text::format_page;
use crate::output::OutputFormat;

/// Print the identifiers derived for a page. Never touches the network.
pub fn identify_page(
    config: &Config,
    location: &str,
    title: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let format = super::require_data_format(format, "identify")?;
    let page = PageIdentifierResolver::new(config.site.clone()).resolve(location, title);

    match format {
        OutputFormat::Json => print_json(&IdentifyOutput::new(&page))?,
        _ => print!("{}", format_page(&page)),
    }
    Ok(())
}
