use std::path::PathBuf;

use clap::{Arg, ArgMatches, Command, value_parser};

use crate::domain::{AudioFormat, ObjectKey, RequestId};

/// A parsed command-line request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Split {
        file: PathBuf,
        request_id: RequestId,
    },
    Resample {
        file: PathBuf,
        key: Option<ObjectKey>,
        target: AudioFormat,
    },
    Upload {
        file: PathBuf,
        key: Option<ObjectKey>,
    },
    Put {
        file: PathBuf,
        key: Option<ObjectKey>,
    },
}

fn file_arg() -> Arg {
    Arg::new("file")
        .value_name("FILE")
        .help("Path to the input audio file")
        .required(true)
        .value_parser(value_parser!(PathBuf))
}

fn key_arg() -> Arg {
    Arg::new("key")
        .short('k')
        .long("key")
        .value_name("OBJECT_KEY")
        .help("Remote object key (defaults to {prefix}/{unix_ts}_{file_stem}.wav)")
        .value_parser(|s: &str| ObjectKey::from_raw(s))
}

pub fn build_cli() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .about("Validate, split or resample audio recordings and upload them to object storage")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("split")
                .about("Split a WAV file into playable parts and upload each one")
                .arg(file_arg())
                .arg(
                    Arg::new("request-id")
                        .short('r')
                        .long("request-id")
                        .value_name("ID")
                        .help("Identifier used in the part object keys (defaults to a UUID)")
                        .value_parser(|s: &str| RequestId::parse(s)),
                ),
        )
        .subcommand(
            Command::new("resample")
                .about("Rewrite the WAV header to a target format and upload in parts")
                .arg(file_arg())
                .arg(key_arg())
                .arg(
                    Arg::new("sample-rate")
                        .long("sample-rate")
                        .value_name("HZ")
                        .default_value("16000")
                        .value_parser(value_parser!(u32).range(1..)),
                )
                .arg(
                    Arg::new("channels")
                        .long("channels")
                        .value_name("N")
                        .default_value("1")
                        .value_parser(value_parser!(u16).range(1..)),
                )
                .arg(
                    Arg::new("bits")
                        .long("bits")
                        .value_name("BITS")
                        .default_value("16")
                        .value_parser(value_parser!(u16).range(8..=32)),
                ),
        )
        .subcommand(
            Command::new("upload")
                .about("Upload a file unchanged through a multipart transfer")
                .arg(file_arg())
                .arg(key_arg()),
        )
        .subcommand(
            Command::new("put")
                .about("Upload an already processed file in a single request")
                .arg(file_arg())
                .arg(key_arg()),
        )
}

pub fn parse_invocation(matches: &ArgMatches) -> Option<Invocation> {
    let (name, sub) = matches.subcommand()?;
    let file = sub.get_one::<PathBuf>("file")?.clone();
    let key = || sub.get_one::<ObjectKey>("key").cloned();

    match name {
        "split" => Some(Invocation::Split {
            file,
            request_id: sub
                .get_one::<RequestId>("request-id")
                .cloned()
                .unwrap_or_default(),
        }),
        "resample" => Some(Invocation::Resample {
            file,
            key: key(),
            target: AudioFormat::new(
                *sub.get_one::<u32>("sample-rate")?,
                *sub.get_one::<u16>("channels")?,
                *sub.get_one::<u16>("bits")?,
            ),
        }),
        "upload" => Some(Invocation::Upload { file, key: key() }),
        "put" => Some(Invocation::Put { file, key: key() }),
        _ => None,
    }
}
