use std::{process, sync::Arc};

use chrono::Utc;
use clap::{ArgEnum, Parser, Subcommand};
use colored::Colorize;
use inventory::{
    commands::{render_footer, render_row, Editor, EditorForm, Inventory, SaveOutcome},
    util::{Column, DbHelper, InventoryProvider, SortOrder},
    AppConfig, Result,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "inventory")]
#[clap(version = "0.1")]
#[clap(about = "Track products, stock and suppliers")]
pub struct Cli {
    /// Database file to manage
    #[clap(short, long)]
    dbfile: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    List {
        /// Column to sort by
        #[clap(long, arg_enum)]
        sort: Option<SortColumn>,
        /// Sort in descending order
        #[clap(long)]
        desc: bool,
        /// Page to show, starting at 1
        #[clap(long, default_value = "1")]
        page: usize,
        /// Products per page
        #[clap(long, default_value = "20")]
        per_page: usize,
        /// Print products as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show a single product
    Show {
        id: i64,
        /// Print the product as JSON
        #[clap(long)]
        json: bool,
    },

    /// Add a new product
    Add {
        #[clap(flatten)]
        fields: Fields,
    },

    /// Change the given fields of a product
    Edit {
        id: i64,
        #[clap(flatten)]
        fields: Fields,
    },

    /// Delete a product
    Delete { id: i64 },

    /// Delete every product
    DeleteAll,

    /// Insert a sample product
    Dummy,

    /// Sell one unit of a product
    Sale { id: i64 },

    /// Add units to a product's stock
    Restock {
        id: i64,
        #[clap(long, default_value = "1")]
        amount: u32,
    },

    /// Print a mailto link ordering more of a product from its supplier
    Order { id: i64 },
}

#[derive(clap::Args)]
struct Fields {
    #[clap(long)]
    brand: Option<String>,
    #[clap(long)]
    model: Option<String>,
    #[clap(long, allow_hyphen_values = true)]
    price: Option<String>,
    #[clap(long, allow_hyphen_values = true)]
    quantity: Option<String>,
    #[clap(long)]
    supplier: Option<String>,
    #[clap(long)]
    email: Option<String>,
    /// Location of the product image
    #[clap(long)]
    image: Option<String>,
}

impl From<Fields> for EditorForm {
    fn from(fields: Fields) -> Self {
        Self {
            brand: fields.brand,
            model: fields.model,
            price: fields.price,
            quantity: fields.quantity,
            supplier: fields.supplier,
            email: fields.email,
            image: fields.image,
        }
    }
}

#[derive(Copy, Clone, ArgEnum)]
enum SortColumn {
    Id,
    Brand,
    Model,
    Price,
    Quantity,
    Supplier,
}

impl From<SortColumn> for Column {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::Id => Column::Id,
            SortColumn::Brand => Column::Brand,
            SortColumn::Model => Column::Model,
            SortColumn::Price => Column::Price,
            SortColumn::Quantity => Column::Quantity,
            SortColumn::Supplier => Column::SupplierName,
        }
    }
}

async fn run(command: Commands, provider: Arc<InventoryProvider>) -> Result<()> {
    match command {
        Commands::List {
            sort,
            desc,
            page,
            per_page,
            json,
        } => {
            let sort = sort.map(|column| SortOrder {
                column: column.into(),
                descending: desc,
            });
            let page = Inventory::new(provider)
                .list(sort, page.saturating_sub(1), per_page)
                .await?;

            if json {
                println!("{}", to_json(page.items()));
            } else if page.items().is_empty() {
                println!("{}", "No products yet. Add one with `inventory add`.".dimmed());
            } else {
                for product in page.items() {
                    println!("{}", render_row(product));
                }
                println!("{}", render_footer(&page).dimmed());
            }
        }
        Commands::Show { id, json } => {
            let product = Editor::existing(provider, id).load()?;
            if json {
                println!("{}", to_json(&product));
            } else {
                println!("{} {}", "Brand:   ".bold(), product.brand.unwrap_or_default());
                println!("{} {}", "Model:   ".bold(), product.model);
                println!("{} ${}", "Price:   ".bold(), product.price);
                println!("{} {}", "Stock:   ".bold(), product.quantity);
                println!("{} {}", "Supplier:".bold(), product.supplier_name);
                println!(
                    "{} {}",
                    "Email:   ".bold(),
                    product.supplier_email.unwrap_or_default()
                );
                println!("{} {}", "Image:   ".bold(), product.image_uri.unwrap_or_default());
            }
        }
        Commands::Add { fields } => match Editor::new_product(provider).save(&fields.into())? {
            SaveOutcome::Inserted(id) => println!("{} {}", "Product saved with id".green(), id),
            _ => println!("{}", "Nothing to save".yellow()),
        },
        Commands::Edit { id, fields } => {
            match Editor::existing(provider, id).save(&fields.into())? {
                SaveOutcome::Updated(0) => println!("{}", "Error with updating product".red()),
                SaveOutcome::Updated(_) => println!("{}", "Product updated".green()),
                _ => println!("{}", "Nothing to update".yellow()),
            }
        }
        Commands::Delete { id } => match Editor::existing(provider, id).delete()? {
            0 => println!("{}", "Error with deleting product".red()),
            _ => println!("{}", "Product deleted".green()),
        },
        Commands::DeleteAll => {
            let rows = Inventory::new(provider).delete_all()?;
            println!("{} {}", rows, "products deleted".green());
        }
        Commands::Dummy => {
            let id = Inventory::new(provider).insert_dummy()?;
            println!("{} {}", "Sample product saved with id".green(), id);
        }
        Commands::Sale { id } => match Inventory::new(provider).sale(id)? {
            Some(quantity) => println!("Stock: {}", quantity),
            None => println!("{}", "Out of stock".yellow()),
        },
        Commands::Restock { id, amount } => {
            let quantity = Editor::existing(provider, id).restock(amount)?;
            println!("Stock: {}", quantity);
        }
        Commands::Order { id } => {
            let email = Editor::existing(provider, id).order(Utc::now().date_naive())?;
            if email.to.is_empty() {
                println!("{}", "This product has no supplier email".yellow());
            }
            println!("{}", email.mailto()?);
        }
    }

    Ok(())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config.with_db_path(cli.dbfile),
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            process::exit(2);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("inventory={}", config.log_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let provider = Arc::new(InventoryProvider::new(DbHelper::new(&config.db_path)));
    tracing::debug!(db = %provider.helper().path().display(), "opening inventory");

    if let Err(e) = run(cli.command, provider).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(1);
    }
}
