//! Extraction server command.

use console::style;

use crate::config::Settings;

/// Start the extraction server.
pub async fn cmd_serve(mut settings: Settings, bind: Option<&str>) -> anyhow::Result<()> {
    if let Some(bind) = bind {
        let (host, port) = parse_bind_address(bind, &settings.host, settings.port)?;
        settings.host = host;
        settings.port = port;
    }

    println!(
        "{} Starting ibex server at http://{}",
        style("→").cyan(),
        settings.bind_address()
    );
    println!(
        "  {} workers, languages: {}",
        settings.workers,
        settings
            .languages
            .iter()
            .map(|l| l.code())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(&settings).await
}

/// Parse a bind address that can be:
/// - Just a port: "8080" -> default_host:8080
/// - Just a host: "0.0.0.0" -> 0.0.0.0:default_port
/// - Host and port: "0.0.0.0:8080" -> 0.0.0.0:8080
fn parse_bind_address(
    bind: &str,
    default_host: &str,
    default_port: u16,
) -> anyhow::Result<(String, u16)> {
    let bind = bind.trim();
    if bind.is_empty() {
        anyhow::bail!("Bind address is empty");
    }

    // Try parsing as just a port number
    if let Ok(port) = bind.parse::<u16>() {
        return Ok((default_host.to_string(), port));
    }

    // Try parsing as host:port
    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
        if port_str.chars().all(|c| c.is_ascii_digit()) && !host.contains(':') {
            anyhow::bail!("Invalid port in bind address: {}", bind);
        }
    }

    // Must be just a host, use default port
    Ok((bind.to_string(), default_port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_address() {
        assert_eq!(
            parse_bind_address("8080", "127.0.0.1", 50051).unwrap(),
            ("127.0.0.1".to_string(), 8080)
        );
        assert_eq!(
            parse_bind_address("0.0.0.0", "127.0.0.1", 50051).unwrap(),
            ("0.0.0.0".to_string(), 50051)
        );
        assert_eq!(
            parse_bind_address("0.0.0.0:9000", "127.0.0.1", 50051).unwrap(),
            ("0.0.0.0".to_string(), 9000)
        );
        assert!(parse_bind_address("localhost:99999", "127.0.0.1", 50051).is_err());
        assert!(parse_bind_address("  ", "127.0.0.1", 50051).is_err());
    }
}
