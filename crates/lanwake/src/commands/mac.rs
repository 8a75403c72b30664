//! `lanwake mac`: the MAC input formatter, without a backend.

use serde::Serialize;

use lanwake_core::MacAddress;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct FormattedMac {
    input: String,
    mac: String,
    complete: bool,
}

pub fn handle(raw: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let mac = MacAddress::format_input(raw);
    let formatted = FormattedMac {
        input: raw.to_owned(),
        complete: MacAddress::new(&mac).is_canonical(),
        mac,
    };

    let out = output::render_single(
        global.output,
        &formatted,
        |f| f.mac.clone(),
        |f| f.mac.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
