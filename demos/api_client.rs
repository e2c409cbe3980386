/// Example HTTP client demonstrating how to call the rent calculator API
///
/// Run the server first:
/// ```bash
/// DATA_DIR=tests/fixtures/data cargo run --bin server
/// ```
///
/// Then run this example:
/// ```bash
/// cargo run --example api_client
/// ```
use serde::Deserialize;

#[derive(Deserialize, Debug)]
struct ZipResponse {
    data: LocationData,
}

#[derive(Deserialize, Debug)]
struct LocationData {
    zip: String,
    rent: u32,
    state_slug: String,
    city: String,
}

#[derive(Deserialize, Debug)]
struct AffordabilityResponse {
    data: AffordabilityData,
}

#[derive(Deserialize, Debug)]
struct AffordabilityData {
    monthly_rent: u32,
    percent_display: String,
    result: ResultData,
}

#[derive(Deserialize, Debug)]
struct ResultData {
    is_affordable: bool,
    monthly_net: f64,
}

#[derive(Deserialize, Debug)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Deserialize, Debug)]
struct MetricsResponse {
    total_requests: u64,
    requests_in_flight: u64,
    uptime_seconds: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let zip = std::env::var("ZIP").unwrap_or_else(|_| "78701".to_string());
    let client = reqwest::Client::new();

    println!("=== Rent Calculator HTTP API Client Demo ===\n");

    // 1. Health Check
    println!("1. Checking server health...");
    let health_url = format!("{}/health", base_url);
    let health: HealthResponse = client.get(&health_url).send().await?.json().await?;
    println!("   Server status: {}", health.status);
    println!("   Version: {}\n", health.version);

    // 2. Zip lookup
    println!("2. Looking up zip {}...", zip);
    let zip_url = format!("{}/api/zip/{}", base_url, zip);
    let response = client.get(&zip_url).send().await?;
    if response.status().is_success() {
        let result: ZipResponse = response.json().await?;
        println!("   City: {}", result.data.city.to_uppercase());
        println!("   State: {}", result.data.state_slug);
        println!("   Zip: {}", result.data.zip);
        println!("   Average 2-Bed Rent: ${}/mo\n", result.data.rent);
    } else {
        let error_text = response.text().await?;
        println!("   Error: {}\n", error_text);
    }

    // 3. Affordability for a few salaries
    println!("3. Checking affordability...");
    for salary in ["45,000", "65,000", "120,000"] {
        let response = client
            .get(format!("{}/api/affordability", base_url))
            .query(&[("zip", zip.as_str()), ("salary", salary)])
            .send()
            .await?;
        if response.status().is_success() {
            let result: AffordabilityResponse = response.json().await?;
            println!(
                "   ${} -> rent ${} is {}% of ${:.0}/mo take-home: {}",
                salary,
                result.data.monthly_rent,
                result.data.percent_display,
                result.data.result.monthly_net,
                if result.data.result.is_affordable {
                    "YES"
                } else {
                    "NO"
                }
            );
        } else {
            let error_text = response.text().await?;
            println!("   ${} -> Error: {}", salary, error_text);
        }
    }
    println!();

    // 4. Get Metrics
    println!("4. Getting server metrics...");
    let metrics_url = format!("{}/api/metrics", base_url);
    let metrics: MetricsResponse = client.get(&metrics_url).send().await?.json().await?;
    println!("   Total requests: {}", metrics.total_requests);
    println!("   Requests in flight: {}", metrics.requests_in_flight);
    println!("   Uptime: {} seconds\n", metrics.uptime_seconds);

    println!("=== Demo Complete ===");

    Ok(())
}
