use anyhow::{bail, Context, Result};
use wayfinder::upstream::{RouteRequest, Upstream};

/// Parse a `lon,lat` pair.
pub fn parse_coord(s: &str) -> Result<[f64; 2]> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        bail!("Expected lon,lat but got '{}'", s);
    }
    let lon: f64 = parts[0]
        .parse()
        .with_context(|| format!("Invalid longitude in '{}'", s))?;
    let lat: f64 = parts[1]
        .parse()
        .with_context(|| format!("Invalid latitude in '{}'", s))?;
    Ok([lon, lat])
}

pub async fn run(coords: Vec<[f64; 2]>, avoid: Vec<String>, json: bool) -> Result<()> {
    let mut request = RouteRequest::new(coords);
    if !avoid.is_empty() {
        request = request.avoid(avoid);
    }
    request.validate()?;

    let upstream = super::upstream()?;
    let route = upstream
        .route(&request)
        .await
        .context("Failed to get route")?;
    let summary = route.summarize_now()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{:.2} km, {:.2} min, arriving {}",
        summary.distance_km, summary.duration_min, summary.estimated_arrival
    );
    println!("{:-<60}", "");
    for (i, step) in summary.steps.iter().enumerate() {
        println!("{:>3}. {}", i + 1, step);
    }

    Ok(())
}
