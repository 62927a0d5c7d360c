//! Paged-memory simulator - Main Entry Point
//!
//! Usage: pagesim [OPTIONS] <command>...
//!
//! Commands (token-separated, processed in order):
//!   pfm                    - print the page free map
//!   ppt <proc>             - print a process's page table
//!   np <proc> <pages>      - create a process with an initial page allocation
//!   kp <proc>              - kill a process, releasing all its frames
//!   sb <proc> <vaddr> <value> - store a byte at a virtual address
//!   lb <proc> <vaddr>      - load a byte from a virtual address
//!
//! Options:
//!   -v, --verbose  Trace allocator and process lifecycle events on stderr
//!   -h, --help     Print help information

use std::env;
use std::process;
use std::slice;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};

use pagesim::access::{load_byte, store_byte};
use pagesim::memory::PhysicalMemory;
use pagesim::process::{create_process, destroy_process};
use pagesim::{logging, report, VirtAddr, PAGE_COUNT, PAGE_SIZE};

/// Command-line configuration
struct Config {
    commands: Vec<Command>,
    verbose: bool,
}

/// One shell command, tokenized and parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    PageFreeMap,
    PageTable { proc: u8 },
    NewProcess { proc: u8, pages: usize },
    KillProcess { proc: u8 },
    StoreByte { proc: u8, vaddr: usize, value: u8 },
    LoadByte { proc: u8, vaddr: usize },
}

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            process::exit(1);
        }
    };

    logging::init(config.verbose);
    run(&config);
}

fn print_help(program: &str) {
    eprintln!("Paged-memory simulator - allocates frames and translates virtual addresses");
    eprintln!();
    eprintln!("Usage: {} [OPTIONS] <command>...", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  pfm                        Print the page free map");
    eprintln!("  ppt <proc>                 Print process <proc>'s page table");
    eprintln!("  np <proc> <pages>          New process with <pages> data pages");
    eprintln!("  kp <proc>                  Kill process <proc>");
    eprintln!("  sb <proc> <vaddr> <value>  Store byte <value> at <vaddr>");
    eprintln!("  lb <proc> <vaddr>          Load the byte at <vaddr>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -v, --verbose  Trace allocator and lifecycle events on stderr");
    eprintln!("  -h, --help     Print this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} np 0 2 ppt 0 sb 0 0 99 lb 0 0 kp 0 pfm", program);
}

fn parse_args() -> Result<Config> {
    let args: Vec<String> = env::args().collect();
    let program = &args[0];

    let mut verbose = false;
    let mut positional: Vec<&str> = Vec::new();

    for arg in &args[1..] {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help(program);
                process::exit(0);
            }
            "-v" | "--verbose" => {
                verbose = true;
            }
            _ if arg.starts_with('-') => {
                bail!("Unknown option: {arg}\nUse --help for usage information.");
            }
            _ => {
                positional.push(arg);
            }
        }
    }

    if positional.is_empty() {
        print_help(program);
        bail!("\nError: no commands supplied");
    }

    let commands = parse_commands(&positional)?;
    Ok(Config { commands, verbose })
}

fn parse_commands(tokens: &[&str]) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    let mut it = tokens.iter();

    while let Some(&mnemonic) = it.next() {
        let command = match mnemonic {
            "pfm" => Command::PageFreeMap,
            "ppt" => Command::PageTable {
                proc: operand(&mut it, "ppt", "proc")?,
            },
            "np" => Command::NewProcess {
                proc: operand(&mut it, "np", "proc")?,
                pages: operand(&mut it, "np", "pages")?,
            },
            "kp" => Command::KillProcess {
                proc: operand(&mut it, "kp", "proc")?,
            },
            "sb" => Command::StoreByte {
                proc: operand(&mut it, "sb", "proc")?,
                vaddr: operand(&mut it, "sb", "vaddr")?,
                // truncate to the storage unit, one byte
                value: operand::<u64>(&mut it, "sb", "value")? as u8,
            },
            "lb" => Command::LoadByte {
                proc: operand(&mut it, "lb", "proc")?,
                vaddr: operand(&mut it, "lb", "vaddr")?,
            },
            _ => bail!("unknown command: {mnemonic}\nUse --help for usage information."),
        };
        commands.push(command);
    }

    Ok(commands)
}

fn operand<T: FromStr>(it: &mut slice::Iter<'_, &str>, mnemonic: &str, name: &str) -> Result<T> {
    let token = it
        .next()
        .with_context(|| format!("{mnemonic}: missing <{name}> argument"))?;
    token
        .parse()
        .map_err(|_| anyhow!("{mnemonic}: invalid <{name}>: {token}"))
}

/// Dispatch the command stream over a fresh physical memory.
///
/// Core errors are per-command diagnostics: print and keep going.
fn run(config: &Config) {
    let mut pm = PhysicalMemory::new();
    log::debug!(
        "initialized {PAGE_COUNT} frames of {PAGE_SIZE} bytes, {} free",
        pm.free_frame_count()
    );

    for &command in &config.commands {
        match command {
            Command::PageFreeMap => print!("{}", report::page_free_map(&pm)),
            Command::PageTable { proc } => match report::page_table(&pm, proc) {
                Ok(rendered) => print!("{rendered}"),
                Err(e) => println!("{e}"),
            },
            Command::NewProcess { proc, pages } => {
                if let Err(e) = create_process(&mut pm, proc, pages) {
                    println!("{e}");
                }
            }
            Command::KillProcess { proc } => {
                if let Err(e) = destroy_process(&mut pm, proc) {
                    println!("{e}");
                }
            }
            Command::StoreByte { proc, vaddr, value } => {
                match store_byte(&mut pm, proc, VirtAddr::from_raw(vaddr), value) {
                    Ok(access) => println!(
                        "Store proc {}: {} => {}, value={}",
                        access.proc, access.vaddr.raw, access.paddr, access.value
                    ),
                    Err(e) => println!("{e}"),
                }
            }
            Command::LoadByte { proc, vaddr } => {
                match load_byte(&pm, proc, VirtAddr::from_raw(vaddr)) {
                    Ok(access) => println!(
                        "Load proc {}: {} => {}, value={}",
                        access.proc, access.vaddr.raw, access.paddr, access.value
                    ),
                    Err(e) => println!("{e}"),
                }
            }
        }
    }
}
