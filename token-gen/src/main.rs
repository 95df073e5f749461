use chrono::{Duration, Utc};
use clap::Parser;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use uuid::Uuid;

/// Mint an HS256 access token accepted by a jwt-gate server.
///
/// - Header: alg=HS256, typ=JWT
/// - Claims: sub, aud (= service name), iat, exp, jti, roles (optional)
/// - Signed with the same shared key the server reads from JWT_SIGNING_KEY
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
struct Args {
    /// Subject (account id), e.g. 42
    #[arg(long)]
    sub: String,

    /// Service the token is issued for (becomes `aud`)
    #[arg(long, env = "JWT_SERVICE_NAME")]
    service: String,

    /// Shared signing key
    #[arg(long, env = "JWT_SIGNING_KEY", hide_env_values = true)]
    key: String,

    /// Lifetime in seconds. Negative values mint an already-expired token.
    #[arg(long, default_value_t = 3600, allow_negative_numbers = true)]
    ttl: i64,

    /// Role claims (repeatable): --role admin --role auditor
    #[arg(long = "role")]
    roles: Vec<String>,

    /// Override jti. Default: random UUID v4.
    #[arg(long)]
    jti: Option<String>,

    /// Print only the token (no extra lines)
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.key.trim().is_empty() {
        return Err("signing key must not be empty".into());
    }

    let now = Utc::now();
    let exp = now + Duration::seconds(args.ttl);
    let jti = args.jti.unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut claims = serde_json::json!({
        "sub": args.sub,
        "aud": args.service,
        "iat": now.timestamp(),
        "exp": exp.timestamp(),
        "jti": jti,
    });
    if !args.roles.is_empty() {
        claims["roles"] = serde_json::json!(args.roles);
    }

    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(args.key.as_bytes()),
    )?;

    if args.quiet {
        println!("{}", token);
        return Ok(());
    }

    println!("token: {}", token);
    println!("sub: {}", args.sub);
    println!("aud: {}", args.service);
    println!("exp: {} ({})", exp.timestamp(), exp.to_rfc3339());
    println!("jti: {}", jti);
    if args.roles.is_empty() {
        println!("roles: (none)");
    } else {
        println!("roles: {}", args.roles.join(","));
    }

    Ok(())
}
