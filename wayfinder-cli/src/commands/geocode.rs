use anyhow::{Context, Result};
use wayfinder::upstream::Upstream;

pub async fn run(location_text: &str, json: bool) -> Result<()> {
    let upstream = super::upstream()?;
    let place = upstream
        .geocode(location_text)
        .await
        .with_context(|| format!("Failed to geocode '{}'", location_text))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&place)?);
    } else {
        println!("{:.6}, {:.6}", place.latitude, place.longitude);
        if let Some(name) = &place.location_name {
            println!("{}", name);
        }
    }

    Ok(())
}
