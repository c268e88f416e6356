//! Run with: cargo run --package server --bin generate-types --features typescript

use std::fs;
use std::path::Path;

fn main() {
    println!("Generating TypeScript types...");

    let out_dir = Path::new("frontend/src/types/generated");

    if let Err(e) = fs::create_dir_all(out_dir) {
        eprintln!("Failed to create output directory: {}", e);
        std::process::exit(1);
    }

    #[cfg(feature = "typescript")]
    {
        if let Err(e) = export_all(out_dir) {
            eprintln!("Failed to export types: {}", e);
            std::process::exit(1);
        }
        println!("Types exported to {}", out_dir.display());

        if let Err(e) = generate_index(out_dir) {
            eprintln!("Failed to write index.ts: {}", e);
            std::process::exit(1);
        }
    }

    #[cfg(not(feature = "typescript"))]
    {
        eprintln!("Error: typescript feature is not enabled");
        eprintln!("Run with: cargo run --package server --bin generate-types --features typescript");
        std::process::exit(1);
    }
}

#[cfg(feature = "typescript")]
const EXPORTED: &[&str] = &[
    "Prospect",
    "FunnelStage",
    "ColorCode",
    "CreateProspectRequest",
    "UpdateProspectRequest",
    "Interaction",
    "InteractionType",
    "CreateInteractionRequest",
    "FollowUp",
    "FollowUpMethod",
    "FollowUpStatus",
    "CreateFollowUpRequest",
    "UpdateFollowUpRequest",
    "GamificationStats",
    "AccountabilitySummary",
    "EventEnvelope",
    "Event",
];

#[cfg(feature = "typescript")]
fn export_all(out_dir: &Path) -> Result<(), ts_rs::ExportError> {
    use ts_rs::TS;

    prospect_core::Prospect::export_all_to(out_dir)?;
    prospect_core::FunnelStage::export_all_to(out_dir)?;
    prospect_core::ColorCode::export_all_to(out_dir)?;
    prospect_core::CreateProspectRequest::export_all_to(out_dir)?;
    prospect_core::UpdateProspectRequest::export_all_to(out_dir)?;
    prospect_core::Interaction::export_all_to(out_dir)?;
    prospect_core::InteractionType::export_all_to(out_dir)?;
    prospect_core::CreateInteractionRequest::export_all_to(out_dir)?;
    prospect_core::FollowUp::export_all_to(out_dir)?;
    prospect_core::FollowUpMethod::export_all_to(out_dir)?;
    prospect_core::FollowUpStatus::export_all_to(out_dir)?;
    prospect_core::CreateFollowUpRequest::export_all_to(out_dir)?;
    prospect_core::UpdateFollowUpRequest::export_all_to(out_dir)?;
    prospect_core::GamificationStats::export_all_to(out_dir)?;
    prospect_core::AccountabilitySummary::export_all_to(out_dir)?;

    events::EventEnvelope::export_all_to(out_dir)?;
    events::Event::export_all_to(out_dir)?;

    Ok(())
}

#[cfg(feature = "typescript")]
fn generate_index(out_dir: &Path) -> std::io::Result<()> {
    let index_path = out_dir.join("index.ts");

    let mut exports = String::from(
        "// Auto-generated - regenerate with: cargo run --package server --bin generate-types --features typescript\n\n",
    );
    for name in EXPORTED {
        exports.push_str(&format!("export * from './{}';\n", name));
    }

    fs::write(&index_path, exports)?;
    println!("Generated {}", index_path.display());
    Ok(())
}
