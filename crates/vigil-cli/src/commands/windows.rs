use vigil_core::enums::Horizon;
use vigil_evidence::compute_windows;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::WindowsArgs;
use crate::commands::parse::parse_instant;
use crate::output::output;

/// Handle `vigil windows`.
pub fn handle(args: &WindowsArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let detected_at = parse_instant(Some(&args.detected_at), "detected-at")?;
    let horizon = Horizon::try_from(args.horizon)?;
    output(&compute_windows(detected_at, horizon), flags.format)
}
