use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arena_codec::{decode_exit, decode_link, decode_location};
use arena_core::tokens::{derive_event_topic, normalize_signature, TranscriptLocation};
use arena_core::{LocationId, Selector};
use arena_router::{
    encode_selector_array, Binding, EndpointManifest, FacetInterface, FacetRouter,
    InMemoryTransport, Target,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{debug, error};

mod config;
mod error;

use crate::config::CliConfig;
use crate::error::CliError;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the function selectors of a JSON interface descriptor
    Selectors {
        descriptor: PathBuf,
        /// Comma separated signature prefixes to leave out
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,
        /// Encode selectors in byte order instead of signature order
        #[arg(long)]
        sort: bool,
        /// Print one selector per line
        #[arg(long)]
        show_sel: bool,
        /// Print one selector and signature per line
        #[arg(long)]
        show_sigs: bool,
        /// Skip the encoded bytes4[] output
        #[arg(long)]
        no_encode: bool,
    },
    /// Derive the topic of an event signature
    Topic { signature: String },
    /// Resolve a member name against the configured endpoint
    Resolve {
        member: String,
        /// Manifest to load instead of the configured one
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
    /// Decode a topology wire payload
    Decode {
        #[command(subcommand)]
        payload: DecodeCommands,
    },
    /// Derive the token committing a location to a block
    Token { block: u64, location: LocationId },
    /// Print the effective configuration
    Config,
}

#[derive(Subcommand)]
enum DecodeCommands {
    /// 4 byte exit payload
    Exit { hex: String },
    /// 5 byte link payload
    Link { hex: String },
    /// Location kind and its four side strings, north first
    Location {
        kind: u8,
        north: String,
        west: String,
        south: String,
        east: String,
    },
}

fn parse_hex(text: &str) -> Result<Vec<u8>, CliError> {
    let text = text.trim();
    let digits = text.strip_prefix("0x").unwrap_or(text);
    Ok(hex::decode(digits)?)
}

fn read_descriptor(path: &Path) -> Result<FacetInterface, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(FacetInterface::from_json(&text)?)
}

struct SelectorOptions {
    exclude: Vec<String>,
    sort: bool,
    show_sel: bool,
    show_sigs: bool,
    no_encode: bool,
}

fn selectors_output(iface: &FacetInterface, opts: &SelectorOptions) -> String {
    let listed = iface.selectors(&opts.exclude, false);
    let mut lines = Vec::new();
    if opts.show_sel || opts.show_sigs {
        for (selector, signature) in &listed {
            if opts.show_sigs {
                lines.push(format!("{selector} {signature}"));
            } else {
                lines.push(selector.to_string());
            }
        }
    }
    if !opts.no_encode {
        let mut selectors: Vec<Selector> =
            listed.iter().map(|(selector, _)| *selector).collect();
        if opts.sort {
            selectors.sort();
        }
        lines.push(format!("0x{}", hex::encode(encode_selector_array(&selectors))));
    }
    lines.join("\n")
}

fn resolve_output(manifest_path: &Path, member: &str) -> Result<String, CliError> {
    let manifest = EndpointManifest::load(manifest_path)?;
    let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let router = FacetRouter::from_manifest(
        &manifest,
        base_dir,
        Arc::new(InMemoryTransport::default()),
    )?;
    let value = match router.resolve(member) {
        Some(Binding::Function {
            target,
            handle,
            function,
        }) => json!({
            "member": member,
            "target": target,
            "interface": handle.name(),
            "signature": function.signature,
            "selector": function.selector.to_string(),
        }),
        Some(Binding::Native(op)) => json!({
            "member": member,
            "target": Target::RouterSelf,
            "native": op.name(),
        }),
        None => return Err(CliError::UnknownMember(member.to_string())),
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

fn decode_output(payload: &DecodeCommands) -> Result<String, CliError> {
    let text = match payload {
        DecodeCommands::Exit { hex } => {
            serde_json::to_string(&decode_exit(&parse_hex(hex)?)?.to_wire())?
        }
        DecodeCommands::Link { hex } => {
            serde_json::to_string(&decode_link(&parse_hex(hex)?)?.to_wire())?
        }
        DecodeCommands::Location {
            kind,
            north,
            west,
            south,
            east,
        } => {
            let location = decode_location(
                *kind,
                &parse_hex(north)?,
                &parse_hex(west)?,
                &parse_hex(south)?,
                &parse_hex(east)?,
            )?;
            serde_json::to_string(&location.to_wire())?
        }
    };
    Ok(text)
}

fn run(command: Commands, cfg: &CliConfig) -> Result<String, CliError> {
    match command {
        Commands::Selectors {
            descriptor,
            exclude,
            sort,
            show_sel,
            show_sigs,
            no_encode,
        } => {
            let iface = read_descriptor(&descriptor)?;
            debug!(
                descriptor = %descriptor.display(),
                functions = iface.functions().count(),
                "descriptor loaded"
            );
            Ok(selectors_output(
                &iface,
                &SelectorOptions {
                    exclude,
                    sort,
                    show_sel,
                    show_sigs,
                    no_encode,
                },
            ))
        }
        Commands::Topic { signature } => {
            let signature = normalize_signature(&signature)?;
            Ok(format!("{} {signature}", derive_event_topic(&signature)))
        }
        Commands::Resolve { member, manifest } => {
            let path = manifest.unwrap_or_else(|| cfg.manifest_path.clone());
            resolve_output(&path, &member)
        }
        Commands::Decode { payload } => decode_output(&payload),
        Commands::Token { block, location } => {
            let transcript = TranscriptLocation::new(block, location);
            Ok(serde_json::to_string_pretty(&json!({
                "token": format!("0x{}", hex::encode(transcript.token)),
                "block_number": transcript.block_number,
                "id": transcript.id,
            }))?)
        }
        Commands::Config => Ok(serde_json::to_string_pretty(cfg)?),
    }
}

fn main() {
    let cli = Cli::parse();

    let cfg = match CliConfig::new(cli.config.clone()) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("config: {err}");
            std::process::exit(2);
        }
    };

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| cfg.log_filter.clone());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command, &cfg) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
        }
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iface() -> FacetInterface {
        FacetInterface::from_human(&[
            "function joinGame(uint256,bytes)",
            "function lastGame()",
            "function lastTranscript()",
        ])
        .expect("fragments should parse")
    }

    fn opts() -> SelectorOptions {
        SelectorOptions {
            exclude: Vec::new(),
            sort: false,
            show_sel: false,
            show_sigs: false,
            no_encode: false,
        }
    }

    #[test]
    fn cli_parsing() {
        let cli = Cli::try_parse_from([
            "arena",
            "selectors",
            "abi/ArenaFacet.json",
            "--exclude",
            "lastGame,supports",
            "--sort",
        ])
        .expect("selectors should parse");
        match cli.command {
            Commands::Selectors { exclude, sort, .. } => {
                assert_eq!(exclude, vec!["lastGame", "supports"]);
                assert!(sort);
            }
            _ => panic!("expected Selectors command"),
        }

        let cli = Cli::try_parse_from([
            "arena", "decode", "location", "1", "", "0002", "0003", "0006",
        ])
        .expect("decode location should parse");
        assert!(matches!(
            cli.command,
            Commands::Decode {
                payload: DecodeCommands::Location { kind: 1, .. }
            }
        ));

        let cli = Cli::try_parse_from(["arena", "-c", "arena.yaml", "token", "12", "3"])
            .expect("token should parse");
        assert_eq!(cli.config, Some(PathBuf::from("arena.yaml")));
        assert!(matches!(cli.command, Commands::Token { block: 12, location: 3 }));
    }

    #[test]
    fn selectors_listing_and_encoding() {
        let iface = iface();
        let out = selectors_output(
            &iface,
            &SelectorOptions {
                exclude: vec!["lastT".to_string()],
                show_sigs: true,
                ..opts()
            },
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" joinGame(uint256,bytes)"));
        assert!(lines[1].ends_with(" lastGame()"));
        // offset word, length word, two selector words
        assert_eq!(lines[2].len(), 2 + 2 * 32 * 4);

        let encoded_only = selectors_output(
            &iface,
            &SelectorOptions {
                no_encode: true,
                show_sel: true,
                ..opts()
            },
        );
        assert_eq!(encoded_only.lines().count(), 3);
        assert!(encoded_only.lines().all(|line| line.len() == 10));
    }

    #[test]
    fn decode_prints_wire_tuples() {
        let out = decode_output(&DecodeCommands::Exit {
            hex: "0x00010002".to_string(),
        })
        .expect("exit decodes");
        assert_eq!(out, "[1,2]");

        let out = decode_output(&DecodeCommands::Link {
            hex: "0100030004".to_string(),
        })
        .expect("link decodes");
        assert_eq!(out, "[1,[3,4],0,false,false,false]");

        let out = decode_output(&DecodeCommands::Location {
            kind: 1,
            north: String::new(),
            west: "0002".to_string(),
            south: "0003".to_string(),
            east: "0006".to_string(),
        })
        .expect("location decodes");
        assert_eq!(out, "[1,[[],[2],[3],[6]]]");

        let err = decode_output(&DecodeCommands::Exit {
            hex: "000100".to_string(),
        })
        .expect_err("short exit");
        assert!(matches!(err, CliError::Codec(_)));
    }

    #[test]
    fn topic_normalizes_signature() {
        let cfg = CliConfig::new(None).expect("defaults");
        let out = run(
            Commands::Topic {
                signature: "GameCreated( uint256 , address )".to_string(),
            },
            &cfg,
        )
        .expect("topic derives");
        let expected = derive_event_topic("GameCreated(uint256,address)");
        assert_eq!(out, format!("{expected} GameCreated(uint256,address)"));
    }

    #[test]
    fn resolve_reports_missing_manifest() {
        let err = resolve_output(Path::new("/nonexistent/arena/endpoint.toml"), "joinGame")
            .expect_err("manifest is missing");
        assert!(matches!(err, CliError::Manifest(_)));
    }
}
