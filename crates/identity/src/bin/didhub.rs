//! didhub CLI
//!
//! Command-line access to the identity registry and the key utilities,
//! operating on the store selected by the config file or `--store`.
//!
//! Registry commands refuse to run against the in-memory backend, since each
//! invocation is a fresh process and its writes would be lost on exit.

use anyhow::{anyhow, bail, Context, Result};
use didhub_core::{logging, open_store, Config, KeyValueStore, StorageBackend};
use didhub_crypto::{
    create_signature, generate_did_with_prefix, generate_hash, generate_key_pair, generate_seed,
    verify_signature,
};
use didhub_identity::{IdentityEntry, IdentityRegistry, IdentityType};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process;

const REGISTRY_COMMANDS: &[&str] = &[
    "register", "find", "list", "remove", "clear", "export", "import", "check",
];

/// Parsed command line: subcommand, `--key value` options and bare flags.
#[derive(Debug, Default)]
struct Args {
    command: String,
    options: HashMap<String, String>,
    json: bool,
}

impl Args {
    fn get(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| anyhow!("Missing --{} argument", name))
    }
}

fn parse_args(raw: Vec<String>) -> Result<Args> {
    let mut args = Args::default();
    let mut i = 0;
    while i < raw.len() {
        let arg = &raw[i];
        if arg == "--json" {
            args.json = true;
        } else if let Some(name) = arg.strip_prefix("--") {
            i += 1;
            let value = raw
                .get(i)
                .ok_or_else(|| anyhow!("Missing value for --{}", name))?;
            args.options.insert(name.to_string(), value.clone());
        } else if args.command.is_empty() {
            args.command = arg.clone();
        } else {
            bail!("Unexpected argument: {}", arg);
        }
        i += 1;
    }

    if args.command.is_empty() {
        bail!("Usage: didhub <command> [options]");
    }
    Ok(args)
}

fn print_usage() {
    println!("didhub - identity registry and key utilities");
    println!();
    println!("USAGE:");
    println!("    didhub [--config <file>] [--store <path>] [--json] <command> [options]");
    println!();
    println!("REGISTRY COMMANDS:");
    println!("    register  --did <did> --type <type> --id <id> [--label <l>] [--parent <did>]");
    println!("    find      --did <did>");
    println!("    list      [--type <type>] [--parent <did>]");
    println!("    remove    --did <did>");
    println!("    clear");
    println!("    export    [--output <file>]");
    println!("    import    --input <file>");
    println!("    check     Report whether the stored collection parses");
    println!();
    println!("KEY COMMANDS:");
    println!("    seed      [--length <bytes>]");
    println!("    did       [--prefix <prefix>]");
    println!("    keypair   --seed <seed>");
    println!("    sign      --data <text> --private-key <hex>");
    println!("    verify    --data <text> --signature <hex> --public-key <hex>");
    println!("    hash      --data <text>");
    println!();
    println!("Types: organization, creator, operator, machine");
    println!("A --store path ending in .db or .sqlite uses SQLite, otherwise a directory.");
    println!("Registry commands need --store or a config file with a file or sqlite backend.");
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.get("config") {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => Config::default_config(),
    };
    if let Some(store) = args.get("store") {
        config = config.with_store_path(PathBuf::from(store));
    }
    config.validate()?;
    Ok(config)
}

fn print_output<T: Serialize>(json: bool, value: &T, human: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human(value);
    }
    Ok(())
}

fn print_entry(entry: &IdentityEntry) {
    println!("{} ({})", entry.did, entry.identity_type);
    println!("  id:         {}", entry.id);
    if let Some(label) = &entry.label {
        println!("  label:      {}", label);
    }
    if let Some(parent) = &entry.parent_did {
        println!("  parent:     {}", parent);
    }
    if let Some(created_at) = &entry.created_at {
        println!("  created at: {}", created_at);
    }
}

fn run_registry_command<S: KeyValueStore>(
    args: &Args,
    registry: &IdentityRegistry<S>,
) -> Result<()> {
    match args.command.as_str() {
        "register" => {
            let identity_type: IdentityType = args
                .require("type")?
                .parse()
                .map_err(|e: String| anyhow!(e))?;
            let mut entry = IdentityEntry::new(args.require("did")?, identity_type, args.require("id")?);
            entry.label = args.get("label").map(str::to_string);
            entry.parent_did = args.get("parent").map(str::to_string);
            entry.created_at = args.get("created-at").map(str::to_string);

            let stored = registry.register(entry)?;
            print_output(args.json, &stored, |e| {
                println!("Registered:");
                print_entry(e);
            })
        }
        "find" => {
            let did = args.require("did")?;
            match registry.find_by_did(did) {
                Some(entry) => print_output(args.json, &entry, print_entry),
                None => bail!("Identity not found: {}", did),
            }
        }
        "list" => {
            let mut entries = match args.get("parent") {
                Some(parent) => registry.children_of(parent),
                None => registry.all_identities(),
            };
            if let Some(kind) = args.get("type") {
                let kind: IdentityType = kind.parse().map_err(|e: String| anyhow!(e))?;
                entries.retain(|e| e.identity_type == kind);
            }
            print_output(args.json, &entries, |entries| {
                if entries.is_empty() {
                    println!("No identities registered");
                }
                for entry in entries {
                    print_entry(entry);
                }
            })
        }
        "remove" => {
            let did = args.require("did")?;
            match registry.remove(did)? {
                Some(entry) => print_output(args.json, &entry, |e| println!("Removed {}", e.did)),
                None => bail!("Identity not found: {}", did),
            }
        }
        "clear" => {
            registry.clear_registry()?;
            if !args.json {
                println!("Registry cleared");
            }
            Ok(())
        }
        "export" => {
            let exported = registry.export_json()?;
            match args.get("output") {
                Some(path) => {
                    fs::write(path, exported)
                        .with_context(|| format!("Failed to write {}", path))?;
                    if !args.json {
                        println!("Exported to {}", path);
                    }
                }
                None => println!("{}", exported),
            }
            Ok(())
        }
        "import" => {
            let path = args.require("input")?;
            let content =
                fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
            let count = registry
                .import_json(&content)
                .with_context(|| format!("Failed to import {}", path))?;
            #[derive(Serialize)]
            struct ImportOutput {
                imported: usize,
            }
            print_output(args.json, &ImportOutput { imported: count }, |o| {
                println!("Imported {} identities", o.imported)
            })
        }
        "check" => match registry.try_load() {
            Ok(entries) => {
                if !args.json {
                    println!("OK: {} identities under {}", entries.len(), registry.storage_key());
                }
                Ok(())
            }
            Err(e) => bail!("Stored registry is unreadable: {}", e),
        },
        other => bail!("Unknown command: {}", other),
    }
}

fn run_key_command(args: &Args, config: &Config) -> Result<bool> {
    #[derive(Serialize)]
    struct ValueOutput<'a> {
        value: &'a str,
    }

    match args.command.as_str() {
        "seed" => {
            let length = match args.get("length") {
                Some(n) => n.parse().context("Invalid --length")?,
                None => config.crypto.seed_length,
            };
            let seed = generate_seed(length)?;
            print_output(args.json, &ValueOutput { value: &seed }, |o| println!("{}", o.value))?;
        }
        "did" => {
            let prefix = args.get("prefix").unwrap_or(config.crypto.did_prefix.as_str());
            let did = generate_did_with_prefix(prefix);
            print_output(args.json, &ValueOutput { value: &did }, |o| println!("{}", o.value))?;
        }
        "keypair" => {
            let pair = generate_key_pair(args.require("seed")?)?;
            print_output(args.json, &pair, |p| {
                println!("public key:  {}", p.public_key);
                println!("private key: {}", p.private_key);
            })?;
        }
        "sign" => {
            let signature = create_signature(args.require("data")?, args.require("private-key")?)?;
            print_output(args.json, &ValueOutput { value: &signature }, |o| {
                println!("{}", o.value)
            })?;
        }
        "verify" => {
            let valid = verify_signature(
                args.require("data")?,
                args.require("signature")?,
                args.require("public-key")?,
            );
            #[derive(Serialize)]
            struct VerifyOutput {
                valid: bool,
            }
            print_output(args.json, &VerifyOutput { valid }, |o| {
                if o.valid {
                    println!("✓ Signature is VALID");
                } else {
                    println!("✗ Signature is INVALID");
                }
            })?;
            if !valid {
                bail!("Signature verification failed");
            }
        }
        "hash" => {
            let hash = generate_hash(args.require("data")?);
            print_output(args.json, &ValueOutput { value: &hash }, |o| println!("{}", o.value))?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn execute(args: &Args, config: &Config) -> Result<()> {
    if run_key_command(args, config)? {
        return Ok(());
    }

    if !REGISTRY_COMMANDS.contains(&args.command.as_str()) {
        bail!("Unknown command: {}", args.command);
    }
    if config.storage.backend == StorageBackend::Memory {
        bail!(
            "'{}' needs a persistent store: pass --store <path> or use a config with a file or sqlite backend",
            args.command
        );
    }

    let store = open_store(&config.storage)?;
    let registry = IdentityRegistry::new(store).with_storage_key(config.storage.key.clone());
    run_registry_command(args, &registry)
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    logging::init_from_config(&config.logging);
    execute(&args, &config)
}

fn main() {
    let args = match parse_args(std::env::args().skip(1).collect()) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            println!();
            print_usage();
            process::exit(1);
        }
    };

    if args.command == "help" {
        print_usage();
        return;
    }

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
