use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use eyre::{Context, Result};
use recordstore::export::{agenda_markdown, to_csv, to_json, write_artifact};
use recordstore::import::import_records;
use recordstore::{
    AgendaItem, AgendaSummary, FilterSet, GroupOp, Meeting, Product, Store, StoreConfig, Summary, baseline_catalog,
    group_aggregate, normalize,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "recordstore")]
#[command(about = "RecordStore CLI - filter, summarize and export catalog and agenda documents")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file (default: <config dir>/recordstore/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the baseline catalog as JSON
    Seed {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show one page of the filtered catalog
    List {
        #[command(flatten)]
        filters: CatalogFilters,

        /// Page number (clamped to the available pages)
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Summary metrics and per-category / per-brand breakdowns
    Insights {
        #[command(flatten)]
        filters: CatalogFilters,
    },

    /// Compare products side by side with normalized metrics
    Compare {
        /// Catalog JSON file (default: baseline catalog)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Product ids to compare
        #[arg(required = true)]
        ids: Vec<u64>,
    },

    /// Export the filtered catalog as CSV
    ExportCsv {
        #[command(flatten)]
        filters: CatalogFilters,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render an agenda document as Markdown minutes, CSV or normalized JSON
    Agenda {
        /// Agenda JSON file
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, value_enum, default_value_t = AgendaFormat::Markdown)]
        format: AgendaFormat,

        /// Meeting title
        #[arg(long)]
        title: Option<String>,

        /// Meeting date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AgendaFormat {
    Markdown,
    Csv,
    Json,
}

/// Catalog filters; an omitted categorical filter selects every value
#[derive(Args)]
struct CatalogFilters {
    /// Catalog JSON file (default: baseline catalog)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Search name, shade and brand
    #[arg(short, long)]
    query: Option<String>,

    #[arg(long)]
    brand: Vec<String>,

    #[arg(long)]
    category: Vec<String>,

    #[arg(long)]
    finish: Vec<String>,

    /// Maximum price (default: configured price ceiling)
    #[arg(long)]
    max_price: Option<f64>,

    /// Only vegan products
    #[arg(long)]
    vegan: bool,

    /// Only cruelty-free products
    #[arg(long)]
    cruelty_free: bool,
}

impl CatalogFilters {
    fn build(&self, store: &Store<Product>) -> FilterSet {
        let selected = |field: &str, chosen: &[String]| -> Vec<String> {
            if chosen.is_empty() {
                store.distinct(field).into_iter().collect()
            } else {
                chosen.to_vec()
            }
        };

        let mut filters = FilterSet::new()
            .one_of("brand", selected("brand", &self.brand))
            .one_of("category", selected("category", &self.category))
            .one_of("finish", selected("finish", &self.finish))
            .at_most(
                "price",
                self.max_price.unwrap_or(store.config().product.price_ceiling),
            );
        if self.vegan {
            filters = filters.flag("vegan", true);
        }
        if self.cruelty_free {
            filters = filters.flag("cruelty_free", true);
        }
        if let Some(query) = &self.query {
            filters = filters.search::<Product>(query);
        }
        filters
    }
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = StoreConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Seed { output } => {
            let json = to_json(&baseline_catalog())?;
            emit(output.as_deref(), &json)?;
        }
        Commands::List { filters, page } => {
            let mut store = load_catalog(filters.input.as_deref(), config)?;
            let set = filters.build(&store);
            store.set_page(page);
            let view = store.view(&set);

            println!(
                "{} {} of {} (page {}/{})",
                "Products".bold(),
                view.items.len(),
                view.total_items,
                view.number,
                view.total_pages
            );
            if view.items.is_empty() {
                println!("No products match the current filters.");
            }
            for p in &view.items {
                println!("{}", product_row(p));
            }
        }
        Commands::Insights { filters } => {
            let store = load_catalog(filters.input.as_deref(), config)?;
            let matched = store.filter(&filters.build(&store));
            print_summary(&Summary::of(matched.iter().copied()));

            println!("\n{}", "Products per category".bold());
            for (category, count) in group_aggregate(&matched, "category", "", GroupOp::Count) {
                println!("  {:<20} {}", category, count);
            }

            println!("\n{}", "Mean price per brand".bold());
            for (brand, mean) in group_aggregate(&matched, "brand", "price", GroupOp::Mean) {
                println!("  {:<20} {:.2}", brand, mean);
            }

            println!("\n{}", "Mean rating per brand".bold());
            for (brand, mean) in group_aggregate(&matched, "brand", "rating", GroupOp::Mean) {
                println!("  {:<20} {:.2}", brand, mean);
            }
        }
        Commands::Compare { input, ids } => {
            let mut store = load_catalog(input.as_deref(), config)?;
            for id in ids {
                if !store.select(id)? {
                    eprintln!(
                        "{} selection is limited to {} products, skipping {}",
                        "warning:".yellow(),
                        store.config().compare_limit,
                        id
                    );
                }
            }

            let selected = store.selection();
            for row in normalize(&selected, &["price", "rating", "stock"]) {
                let name = selected
                    .iter()
                    .find(|p| p.id == row.id)
                    .map(|p| p.name.as_str())
                    .unwrap_or_default();
                let metrics: Vec<String> = row.values.iter().map(|(k, v)| format!("{}={:.2}", k, v)).collect();
                println!("{:>4}  {:<30} {}", row.id, name, metrics.join("  "));
            }
        }
        Commands::ExportCsv { filters, output } => {
            let store = load_catalog(filters.input.as_deref(), config)?;
            let matched = store.filter(&filters.build(&store));
            write_artifact(&output, &to_csv(&matched))?;
            println!("Exported {} products to {}", matched.len(), output.display());
        }
        Commands::Agenda {
            input,
            format,
            title,
            date,
            output,
        } => {
            let json = fs::read_to_string(&input).with_context(|| format!("Failed to read {:?}", input))?;
            let items: Vec<AgendaItem> = import_records(&json, &config)?;
            let agenda = Store::new(items, config);
            let items: Vec<&AgendaItem> = agenda.records().iter().collect();

            let rendered = match format {
                AgendaFormat::Markdown => {
                    let summary = AgendaSummary::of(items.iter().copied());
                    let date = date
                        .or(summary.first_start.map(|s| s.date()))
                        .unwrap_or_else(|| agenda.config().agenda.date());
                    let mut meeting = Meeting::new(date);
                    if let Some(title) = title {
                        meeting.title = title;
                    }
                    agenda_markdown(&meeting, &items)
                }
                AgendaFormat::Csv => to_csv(&items),
                AgendaFormat::Json => to_json(&items)?,
            };
            emit(output.as_deref(), &rendered)?;
        }
    }

    Ok(())
}

/// Baseline catalog, replaced by the imported document when one is given
fn load_catalog(input: Option<&Path>, config: StoreConfig) -> Result<Store<Product>> {
    let mut store = Store::new(baseline_catalog(), config);
    if let Some(path) = input {
        let json = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let records = import_records(&json, store.config())?;
        store.replace_all(records);
    }
    Ok(store)
}

fn emit(output: Option<&Path>, contents: &str) -> Result<()> {
    match output {
        Some(path) => write_artifact(path, contents),
        None => {
            println!("{}", contents);
            Ok(())
        }
    }
}

/// One catalog line for `list`
fn product_row(p: &Product) -> String {
    format!(
        "{:>4}  {}  {} · {} · {}  {}  {} {} {:.1}  stock {}",
        p.id,
        p.name.bold(),
        p.brand,
        p.category,
        p.finish,
        p.shade.italic(),
        format!("{:.2}", p.price).green(),
        "★".yellow(),
        p.rating,
        p.stock
    )
}

fn print_summary(summary: &Summary) {
    let [price, rating, stock] = summary_cells(summary);
    println!("{}", "Summary".bold());
    println!("  Visible products  {}", summary.count);
    println!("  Mean price        {}", price);
    println!("  Mean rating       {}", rating);
    println!("  Total stock       {}", stock);
}

/// Mean price, mean rating and total stock; undefined values show as a dash
fn summary_cells(summary: &Summary) -> [String; 3] {
    let dash = || "—".to_string();
    [
        summary.mean_price.map(|v| format!("{:.2}", v)).unwrap_or_else(dash),
        summary.mean_rating.map(|v| format!("{:.2}", v)).unwrap_or_else(dash),
        summary.total_stock.map(|v| v.to_string()).unwrap_or_else(dash),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_row() {
        colored::control::set_override(false);
        let catalog = baseline_catalog();
        assert_eq!(
            product_row(&catalog[0]),
            "   1  Liquid Blush  Rare Beauty · Face · Satin  Happy  115.00 ★ 4.8  stock 15"
        );
    }

    #[test]
    fn test_summary_cells_empty_view() {
        let summary = Summary::of(&[] as &[Product]);
        assert_eq!(summary_cells(&summary), ["—", "—", "—"]);
    }

    #[test]
    fn test_summary_cells() {
        let catalog = baseline_catalog();
        let summary = Summary::of(catalog.iter().take(2));
        assert_eq!(summary_cells(&summary), ["117.00", "4.75", "35"]);
    }
}
