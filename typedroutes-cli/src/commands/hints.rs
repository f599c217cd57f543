use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Subcommand};
use std::collections::BTreeSet;
use typedroutes_core::hints::{self, IntOrStr, User};

#[derive(Subcommand, Debug)]
pub enum HintCommand {
    /// Title-case and join a first and last name
    FullName { first: String, last: String },
    /// "<name> is this old: <age>"
    NameWithAge { name: String, age: i64 },
    /// Greet someone, or the world
    SayHi { name: Option<String> },
    /// Echo one value of each scalar kind, the last as bytes
    GetItems {
        text: String,
        count: i64,
        amount: f64,
        #[arg(action = ArgAction::Set)]
        flag: bool,
        raw: String,
    },
    /// Classify a value as int or str
    ProcessItem { item: String },
    /// Echo an (int, int, str) tuple and a set of byte strings
    ProcessItems {
        first: i64,
        second: i64,
        label: String,
        /// Repeatable; duplicates collapse
        #[arg(long = "bytes")]
        bytes: Vec<String>,
    },
    /// Title-case each item
    Titles {
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Print NAME=PRICE pairs as "name: price"
    Prices {
        #[arg(required = true)]
        prices: Vec<String>,
    },
    /// Validate a JSON user record and print it normalized
    User { json: String },
}

/// Run a hint, returning the lines to print
pub fn run(command: HintCommand) -> Result<Vec<String>> {
    let lines = match command {
        HintCommand::FullName { first, last } => vec![hints::full_name(&first, &last)],
        HintCommand::NameWithAge { name, age } => vec![hints::name_with_age(&name, age)],
        HintCommand::SayHi { name } => vec![hints::say_hi(name.as_deref())],
        HintCommand::GetItems { text, count, amount, flag, raw } => {
            vec![hints::describe_items(&hints::get_items(&text, count, amount, flag, raw.as_bytes()))]
        }
        HintCommand::ProcessItem { item } => vec![hints::process_item(&IntOrStr::parse(&item))],
        HintCommand::ProcessItems { first, second, label, bytes } => {
            let set: BTreeSet<Vec<u8>> = bytes.into_iter().map(String::into_bytes).collect();
            let (items_t, items_s) = hints::process_items((first, second, label), set);
            vec![hints::describe_processed(&items_t, &items_s)]
        }
        HintCommand::Titles { items } => hints::title_items(&items),
        HintCommand::Prices { prices } => {
            let parsed = prices.iter().map(|p| parse_price(p)).collect::<Result<Vec<_>>>()?;
            hints::price_lines(&parsed)
        }
        HintCommand::User { json } => {
            let value: serde_json::Value = serde_json::from_str(&json).context("Invalid JSON")?;
            match User::from_value(&value) {
                Ok(user) => vec![serde_json::to_string(&user)?],
                Err(errors) => {
                    return Err(anyhow!(
                        "Invalid user: {}",
                        serde_json::to_string(&errors.into_body())?
                    ))
                }
            }
        }
    };
    Ok(lines)
}

fn parse_price(pair: &str) -> Result<(String, f64)> {
    let (name, price) =
        pair.split_once('=').ok_or_else(|| anyhow!("Expected NAME=PRICE, got '{}'", pair))?;
    let price = price.trim().parse::<f64>().with_context(|| format!("Invalid price for {}", name))?;
    Ok((name.to_string(), price))
}
