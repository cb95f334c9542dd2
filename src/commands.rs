use std::collections::HashSet;
use std::io::{Read as _, Write as _};
use std::time::Duration;

use anyhow::Context as _;
use serde::Serialize;
use serde_json::Value;

use crate::api::{ApiClient, resolve_base_url};
use crate::cli::{
    ApiArgs, DecodeArgs, DeleteArgs, EncodeArgs, ListArgs, PreviewArgs, SaveArgs, ShowArgs,
};
use crate::content::{decode_to_html, encode_from_html};
use crate::listing::{self, ListQuery};
use crate::records::{Card, Category, Draft, records_from_body};

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(input).with_context(|| format!("read input: {input}"))
}

fn read_json(input: &str) -> anyhow::Result<Value> {
    let raw = read_input(input)?;
    serde_json::from_str(&raw).with_context(|| format!("parse json input: {input}"))
}

fn write_json_lines<T: Serialize>(items: impl IntoIterator<Item = T>) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for item in items {
        serde_json::to_writer(&mut out, &item).context("serialize output line")?;
        out.write_all(b"\n").context("write output newline")?;
    }
    out.flush().context("flush stdout")?;
    Ok(())
}

fn client(args: &ApiArgs) -> anyhow::Result<ApiClient> {
    let base_url = resolve_base_url(args.api_url.as_deref())?;
    ApiClient::new(base_url, Duration::from_secs(args.timeout_secs))
}

pub fn decode(args: DecodeArgs) -> anyhow::Result<()> {
    let value = read_json(&args.input)?;
    let html = decode_to_html(&value);
    println!("{html}");
    Ok(())
}

pub fn encode(args: EncodeArgs) -> anyhow::Result<()> {
    let html = read_input(&args.input)?;
    let envelope = encode_from_html(&html);
    let json = serde_json::to_string(&envelope).context("serialize envelope")?;
    println!("{json}");
    Ok(())
}

pub fn preview(args: PreviewArgs) -> anyhow::Result<()> {
    let body = read_json(&args.input)?;
    let records = records_from_body(body).context("parse records")?;
    write_json_lines(records.iter().map(|record| record.card(None)))
}

pub async fn list(args: ListArgs) -> anyhow::Result<()> {
    let client = client(&args.api)?;

    let mut seen = HashSet::new();
    let requested = if args.all {
        Category::ALL_FEED.to_vec()
    } else {
        args.categories
    };
    let categories: Vec<_> = requested
        .into_iter()
        .filter(|category| seen.insert(*category))
        .collect();
    let fetches = categories.iter().map(|&category| {
        let client = &client;
        async move {
            let records = client
                .list(category)
                .await
                .with_context(|| format!("list {}", category.as_str()))?;
            tracing::debug!(category = category.as_str(), count = records.len(), "fetched");
            anyhow::Ok((category, records))
        }
    });
    let feeds = futures_util::future::try_join_all(fetches).await?;

    let records = listing::merge_feeds(feeds);

    let query = ListQuery {
        query: args.query,
        status: args.status,
        sort: args.sort,
        from: args.from,
        to: args.to,
        page: args.page,
        per_page: args.per_page,
    };
    let page = listing::apply(records, &query);
    tracing::info!(
        page = page.page,
        total_pages = page.total_pages,
        total_items = page.total_items,
        "listed records"
    );

    write_json_lines(
        page.items
            .iter()
            .map(|(category, record)| record.card(*category)),
    )
}

pub async fn show(args: ShowArgs) -> anyhow::Result<()> {
    let client = client(&args.api)?;
    let record = client
        .get(args.category, &args.id)
        .await
        .with_context(|| format!("get {} {}", args.category.as_str(), args.id))?;

    #[derive(Serialize)]
    struct Detail {
        #[serde(flatten)]
        card: Card,
        html: String,
        created_date: String,
    }

    let detail = Detail {
        card: record.card(Some(args.category)),
        html: record.html(),
        created_date: listing::format_date_for_input(&record.created_at),
    };
    write_json_lines([detail])
}

pub async fn save(args: SaveArgs) -> anyhow::Result<()> {
    if !args.category.has_rich_contents() {
        anyhow::bail!(
            "{} records have no rich contents to save",
            args.category.as_str()
        );
    }
    let draft = Draft {
        title: args.title,
        html: read_input(&args.html)?,
        status: !args.inactive,
        position: args.position,
        is_research: !args.not_research,
        created_at: args.created_at,
    };
    let payload = draft.to_payload(args.id.is_some())?;
    let client = client(&args.api)?;

    let saved = match args.id.as_deref() {
        Some(id) => client
            .update(args.category, id, &payload)
            .await
            .with_context(|| format!("update {} {id}", args.category.as_str()))?,
        None => client
            .create(args.category, &payload)
            .await
            .with_context(|| format!("create {}", args.category.as_str()))?,
    };

    let id = match saved.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    tracing::info!(category = args.category.as_str(), %id, "saved record");
    write_json_lines([saved])
}

pub async fn delete(args: DeleteArgs) -> anyhow::Result<()> {
    let client = client(&args.api)?;
    client
        .delete(args.category, &args.id)
        .await
        .with_context(|| format!("delete {} {}", args.category.as_str(), args.id))?;
    tracing::info!(category = args.category.as_str(), id = %args.id, "deleted record");
    Ok(())
}
