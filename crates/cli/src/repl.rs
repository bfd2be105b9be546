//! The interactive command loop.
//!
//! Reads commands from stdin until end-of-file or `quit`. Anything after
//! a `#` on a line is a comment, so command scripts can annotate
//! themselves.

use crate::di::Services;
use dnswalk_domain::RecordType;
use std::io::{self, BufRead, Write};
use std::net::IpAddr;

pub fn run(services: &Services) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("DNSLOOKUP> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let args: Vec<&str> = line.split_whitespace().collect();
        match args[0].to_ascii_lowercase().as_str() {
            "quit" | "exit" => break,
            "server" => cmd_server(services, &args),
            "trace" => cmd_trace(services, &args),
            "lookup" | "l" => cmd_lookup(services, &args),
            "dump" => cmd_dump(services),
            _ => {
                eprintln!("Invalid command. Valid commands are:");
                eprintln!("\tlookup fqdn [type]");
                eprintln!("\ttrace on|off");
                eprintln!("\tserver IP");
                eprintln!("\tdump");
                eprintln!("\tquit");
            }
        }
    }

    Ok(())
}

fn cmd_server(services: &Services, args: &[&str]) {
    if args.len() != 2 {
        println!("Invalid call. Format:\n\tserver IP");
        return;
    }
    match args[1].parse::<IpAddr>() {
        Ok(address) => {
            services.resolver.set_root_server(address);
            println!("Root DNS server is now: {address}");
        }
        Err(e) => println!("Invalid root server ({e})."),
    }
}

fn cmd_trace(services: &Services, args: &[&str]) {
    if args.len() != 2 {
        eprintln!("Invalid call. Format:\n\ttrace on|off");
        return;
    }
    match args[1].to_ascii_lowercase().as_str() {
        "on" => {
            services.resolver.set_trace_enabled(true);
            println!("Verbose tracing is now: ON");
        }
        "off" => {
            services.resolver.set_trace_enabled(false);
            println!("Verbose tracing is now: OFF");
        }
        _ => eprintln!("Invalid call. Format:\n\ttrace on|off"),
    }
}

fn cmd_lookup(services: &Services, args: &[&str]) {
    let record_type = match args.len() {
        2 => RecordType::A,
        3 => match RecordType::parse_lookup_type(args[2]) {
            Some(record_type) => record_type,
            None => {
                eprintln!("Invalid query type. Must be one of:\n\tA, AAAA, NS, MX, CNAME");
                return;
            }
        },
        _ => {
            eprintln!("Invalid call. Format:\n\tlookup hostName [type]");
            return;
        }
    };

    for row in services.lookup.execute(args[1], record_type) {
        println!(
            "{:<30} {:<5} {:<8} {}",
            row.host, row.record_type, row.ttl, row.value
        );
    }
}

fn cmd_dump(services: &Services) {
    for (key, records) in services.dump.execute() {
        for record in records {
            println!(
                "{:<30} {:<5} {:<8} {}",
                key.name(),
                key.record_type(),
                record.ttl(),
                record.value_text()
            );
        }
    }
}
