//! `ariadl cleanup` – drop null-valued store keys.

use anyhow::Result;
use ariadl_core::settings::SettingsStore;
use ariadl_core::store::ValueDb;

pub async fn run_cleanup(db: &ValueDb) -> Result<()> {
    let removed = SettingsStore::new(db).cleanup().await?;
    if removed.is_empty() {
        println!("Nothing to clean up.");
    } else {
        for key in &removed {
            println!("removed {key}");
        }
    }
    Ok(())
}
