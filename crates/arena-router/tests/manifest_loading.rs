use std::fs;
use std::path::Path;
use std::sync::Arc;

use arena_core::tokens::derive_selector;
use arena_core::Address;
use arena_router::{EndpointManifest, FacetRouter, InMemoryTransport, RouterError, Target};

const PRIMARY: &str = r#"[
  {"type": "function", "name": "owner", "inputs": [], "outputs": [{"type": "address"}], "stateMutability": "view"},
  {"type": "constructor", "inputs": []}
]"#;

const ARENA: &str = r#"[
  {"type": "function", "name": "joinGame", "inputs": [{"name": "gid", "type": "uint256"}, {"name": "profile", "type": "bytes"}]},
  {"type": "event", "name": "PlayerJoined", "inputs": [{"name": "gid", "type": "uint256", "indexed": true}, {"name": "player", "type": "address"}]},
  {"type": "error", "name": "NotRegistered", "inputs": []}
]"#;

fn scratch_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::create_dir(dir.path().join("abi")).expect("create abi dir");
    dir
}

fn write_manifest(dir: &Path, arena_descriptor: &str) -> EndpointManifest {
    fs::write(dir.join("abi/Diamond.json"), PRIMARY).expect("write primary");
    fs::write(dir.join("abi/ArenaFacet.json"), arena_descriptor).expect("write facet");
    let text = r#"
address = "0x5fbdb2315678afecb367f032d93f642f64180aa3"
primary = "abi/Diamond.json"

[[facets]]
name = "ArenaFacet"
descriptor = "abi/ArenaFacet.json"
"#;
    fs::write(dir.join("endpoint.toml"), text).expect("write manifest");
    EndpointManifest::load(dir.join("endpoint.toml")).expect("manifest should load")
}

#[test]
fn router_builds_from_manifest_on_disk() {
    let dir = scratch_dir();
    let manifest = write_manifest(dir.path(), ARENA);

    let router = FacetRouter::from_manifest(&manifest, dir.path(), Arc::new(InMemoryTransport::default()))
        .expect("router should build");

    let expected: Address = "0x5fbdb2315678afecb367f032d93f642f64180aa3"
        .parse()
        .expect("valid address");
    assert_eq!(router.address(), expected);
    assert_eq!(router.resolve_target("owner"), Some(Target::PrimaryInterface));
    assert!(router.primary().interface().function("owner").expect("owner").is_view());

    let facet = router.get_facet("ArenaFacet").expect("facet loaded");
    let join = facet
        .interface()
        .function("joinGame")
        .expect("joinGame defined");
    assert_eq!(join.selector, derive_selector("joinGame(uint256,bytes)"));
    assert_eq!(
        facet
            .interface()
            .event("PlayerJoined")
            .expect("event defined")
            .indexed_count(),
        1
    );
}

#[test]
fn bad_descriptor_names_the_facet() {
    let dir = scratch_dir();
    let manifest = write_manifest(dir.path(), "{ not json");

    let err = FacetRouter::from_manifest(&manifest, dir.path(), Arc::new(InMemoryTransport::default()))
        .expect_err("descriptor is malformed");
    assert!(matches!(&err, RouterError::Interface { facet, .. } if facet == "ArenaFacet"));
}

#[test]
fn missing_descriptor_is_a_manifest_error() {
    let dir = scratch_dir();
    let manifest = write_manifest(dir.path(), ARENA);
    fs::remove_file(dir.path().join("abi/ArenaFacet.json")).expect("remove facet");

    let err = FacetRouter::from_manifest(&manifest, dir.path(), Arc::new(InMemoryTransport::default()))
        .expect_err("descriptor is missing");
    assert!(matches!(err, RouterError::Manifest(_)));
}
