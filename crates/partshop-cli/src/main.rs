//! partshop CLI - Admin console for product documents
//!
//! Inspects and edits the part trees of stored products: add, edit and
//! remove parts at any depth, attach images, print drill-down outlines and
//! shop deep links, and exchange documents in the nested wire format.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use partshop::{
    shop_link, Explorer, PartDraft, PartNode, PartPath, Product, ProductBuilder, StockLevel,
};
use partshop_store::ProductStore;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "partshop")]
#[command(about = "Admin console for partshop product documents", long_about = None)]
struct Cli {
    /// Store directory (overrides store.toml).
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Overwrite without checking the document revision.
    #[arg(long, global = true)]
    force: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new product document
    New {
        /// Product id (becomes the document file name)
        id: String,
        /// Product title
        #[arg(long)]
        title: String,
        /// Main image URL
        #[arg(long)]
        image: String,
        /// List price
        #[arg(long)]
        price: f64,
        /// Brand name
        #[arg(long)]
        brand: String,
        /// Category name
        #[arg(long)]
        category: String,
        /// Whole-product stock
        #[arg(long, default_value_t = 1)]
        stock: u32,
        /// Long description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List stored products
    List,
    /// Display information about a product
    Info {
        /// Product id
        id: String,
    },
    /// Print a product's part tree as an outline
    Tree {
        /// Product id
        id: String,
    },
    /// Add a part under a path ("" or omitted = top level)
    AddPart {
        /// Product id
        id: String,
        /// Display name for the new part
        #[arg(long)]
        name: String,
        /// Parent path, e.g. "0,2" (top level when omitted)
        #[arg(long, default_value = "")]
        under: String,
        /// Unit price (0 = informational)
        #[arg(long, default_value_t = 0.0)]
        price: f64,
        /// Part-level stock
        #[arg(long, default_value_t = 0)]
        stock: u32,
        /// Human-assigned code
        #[arg(long)]
        label: Option<String>,
        /// Thumbnail URL
        #[arg(long)]
        thumbnail: Option<String>,
        /// Own image URL (makes the part drillable)
        #[arg(long)]
        image: Option<String>,
        /// Hotspot X percent on the parent's image
        #[arg(long)]
        x: Option<f64>,
        /// Hotspot Y percent on the parent's image
        #[arg(long)]
        y: Option<f64>,
    },
    /// Edit a part's fields, keeping its subparts
    EditPart {
        /// Product id
        id: String,
        /// Path of the part, e.g. "0,2,1"
        path: String,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// New unit price
        #[arg(long)]
        price: Option<f64>,
        /// New part-level stock
        #[arg(long)]
        stock: Option<u32>,
        /// New human-assigned code
        #[arg(long)]
        label: Option<String>,
        /// New thumbnail URL
        #[arg(long)]
        thumbnail: Option<String>,
        /// New own image URL
        #[arg(long)]
        image: Option<String>,
        /// New hotspot X percent
        #[arg(long)]
        x: Option<f64>,
        /// New hotspot Y percent
        #[arg(long)]
        y: Option<f64>,
    },
    /// Remove a part (and its whole subtree)
    RmPart {
        /// Product id
        id: String,
        /// Path of the part, e.g. "0,2,1"
        path: String,
    },
    /// Attach a local image file as a base64 data URL
    SetImage {
        /// Product id
        id: String,
        /// Path of the part ("" = the product's main image)
        path: String,
        /// Local image file
        file: PathBuf,
    },
    /// Print the shop deep link for a part
    Link {
        /// Product id
        id: String,
        /// Path of the part ("" = the product page)
        #[arg(default_value = "")]
        path: String,
    },
    /// Export a product in the nested wire format
    Export {
        /// Product id
        id: String,
        /// Output JSON file
        output: PathBuf,
    },
    /// Import a product from the nested wire format
    Import {
        /// Product id to store it under
        id: String,
        /// Input JSON file
        input: PathBuf,
    },
}

/// Optional `store.toml` next to the working directory.
#[derive(Debug, Default, Deserialize)]
struct Config {
    #[serde(default)]
    root: Option<PathBuf>,
}

fn load_config() -> Result<Config> {
    match fs::read_to_string("store.toml") {
        Ok(text) => toml::from_str(&text).context("parsing store.toml"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(err) => Err(err).context("reading store.toml"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Cli {
        store: store_flag,
        force,
        command,
    } = Cli::parse();
    let config = load_config()?;
    let root = store_flag
        .or(config.root)
        .unwrap_or_else(|| PathBuf::from("./store"));
    let store = ProductStore::open(root)?;

    match command {
        Commands::New {
            id,
            title,
            image,
            price,
            brand,
            category,
            stock,
            description,
        } => {
            let product = ProductBuilder::new(title)
                .image(image)
                .price(price)
                .brand(brand)
                .category(category)
                .total_stock(stock)
                .description(if description.is_empty() {
                    "(no description)".to_string()
                } else {
                    description
                })
                .build()?;
            let revision = store.save(&id, &product, Some(0))?;
            println!("Created {} (revision {})", id, revision);
        }
        Commands::List => {
            for id in store.list()? {
                let stored = store.load(&id)?;
                println!(
                    "{:24} {:32} {:>10.2} stock {:>4} {}",
                    id,
                    stored.product.title,
                    stored.product.effective_price(),
                    stored.product.total_stock,
                    stock_flag(&stored.product)
                );
            }
        }
        Commands::Info { id } => {
            show_info(&store, &id)?;
        }
        Commands::Tree { id } => {
            show_tree(&store, &id)?;
        }
        Commands::AddPart {
            id,
            name,
            under,
            price,
            stock,
            label,
            thumbnail,
            image,
            x,
            y,
        } => {
            let mut stored = store.load(&id)?;
            let draft = PartDraft {
                name,
                label,
                description: None,
                price,
                stock,
                thumbnail,
                hotspot: hotspot_from(x, y),
                image,
            };
            let parent = PartPath::parse(&under);
            let part_id = stored.product.tree.insert_at(&parent, draft)?;
            let revision = save(&store, force, &id, &stored.product, stored.revision)?;
            let path = stored.product.tree.path_of(part_id).unwrap_or_default();
            println!("Added part {} at path {} (revision {})", part_id, path, revision);
        }
        Commands::EditPart {
            id,
            path,
            name,
            price,
            stock,
            label,
            thumbnail,
            image,
            x,
            y,
        } => {
            let mut stored = store.load(&id)?;
            let path = PartPath::parse(&path);
            let current = stored
                .product
                .tree
                .resolve(&path)
                .map(draft_of)
                .with_context(|| format!("no part at path {path}"))?;
            let hotspot = match (x, y, current.hotspot) {
                (None, None, existing) => existing,
                (x, y, existing) => hotspot_from(
                    x.or(existing.map(|h| h.x_percent)),
                    y.or(existing.map(|h| h.y_percent)),
                ),
            };
            let draft = PartDraft {
                name: name.unwrap_or(current.name),
                label: label.or(current.label),
                description: current.description,
                price: price.unwrap_or(current.price),
                stock: stock.unwrap_or(current.stock),
                thumbnail: thumbnail.or(current.thumbnail),
                hotspot,
                image: image.or(current.image),
            };
            stored.product.tree.update_at(&path, draft)?;
            let revision = save(&store, force, &id, &stored.product, stored.revision)?;
            println!("Updated part at {} (revision {})", path, revision);
        }
        Commands::RmPart { id, path } => {
            let mut stored = store.load(&id)?;
            let path = PartPath::parse(&path);
            stored.product.tree.delete_at(&path)?;
            let revision = save(&store, force, &id, &stored.product, stored.revision)?;
            println!("Removed part at {} (revision {})", path, revision);
        }
        Commands::SetImage { id, path, file } => {
            let mut stored = store.load(&id)?;
            let url = partshop_store::data_url(&file)
                .with_context(|| format!("encoding {}", file.display()))?;
            let path = PartPath::parse(&path);
            if path.is_root() {
                stored.product.image = url;
            } else {
                let part_id = stored
                    .product
                    .tree
                    .resolve_id(&path)
                    .with_context(|| format!("no part at path {path}"))?;
                stored.product.tree.set_image(part_id, url)?;
            }
            let revision = save(&store, force, &id, &stored.product, stored.revision)?;
            println!("Image set at {} (revision {})", path, revision);
        }
        Commands::Link { id, path } => {
            let stored = store.load(&id)?;
            let path = PartPath::parse(&path);
            if !path.is_root() && stored.product.tree.resolve(&path).is_none() {
                bail!("no part at path {path}");
            }
            println!("{}", shop_link(&id, &path));
        }
        Commands::Export { id, output } => {
            let stored = store.load(&id)?;
            fs::write(&output, stored.product.to_wire_json()?)?;
            println!("Exported {} to {}", id, output.display());
        }
        Commands::Import { id, input } => {
            let json = fs::read_to_string(&input)?;
            let product = Product::from_wire_json(&json)?;
            let revision = store.save(&id, &product, if force { None } else { Some(0) })?;
            println!(
                "Imported {} part(s) into {} (revision {})",
                product.tree.len(),
                id,
                revision
            );
        }
    }

    Ok(())
}

/// Save honoring --force (legacy last-write-wins) vs revision checking.
fn save(
    store: &ProductStore,
    force: bool,
    id: &String,
    product: &Product,
    loaded_revision: u64,
) -> Result<u64> {
    let expected = if force { None } else { Some(loaded_revision) };
    Ok(store.save(id, product, expected)?)
}

fn hotspot_from(x: Option<f64>, y: Option<f64>) -> Option<partshop::Hotspot> {
    match (x, y) {
        (None, None) => None,
        (x, y) => Some(partshop::Hotspot::new(x.unwrap_or(0.0), y.unwrap_or(0.0))),
    }
}

/// Rebuild an editable draft from a stored node.
fn draft_of(node: &PartNode) -> PartDraft {
    PartDraft {
        name: node.name.clone(),
        label: node.label.clone(),
        description: node.description.clone(),
        price: node.price,
        stock: node.stock,
        thumbnail: node.thumbnail.clone(),
        hotspot: node.hotspot,
        image: node.kind.image().map(str::to_string),
    }
}

fn stock_flag(product: &Product) -> &'static str {
    match product.stock_level() {
        StockLevel::Red => "RED",
        StockLevel::Yellow => "YELLOW",
        StockLevel::Ok => "",
    }
}

fn show_info(store: &ProductStore, id: &String) -> Result<()> {
    let stored = store.load(id)?;
    let product = &stored.product;

    println!("product: {}", id);
    println!("  Title: {}", product.title);
    println!("  Brand: {} / {}", product.brand, product.category);
    println!("  Price: {:.2}", product.price);
    if product.sale_price > 0.0 {
        println!("  Sale price: {:.2}", product.sale_price);
    }
    println!(
        "  Stock: {}{}",
        product.total_stock,
        match product.stock_level() {
            StockLevel::Red => " (RED)",
            StockLevel::Yellow => " (YELLOW)",
            StockLevel::Ok => "",
        }
    );
    println!("  Revision: {}", stored.revision);
    println!("  Parts: {}", product.tree.len());

    let depth = product.tree.walk().map(|(d, _)| d + 1).max().unwrap_or(0);
    println!("  Tree depth: {}", depth);

    let explorer = Explorer::new(product);
    let top = explorer.current_parts();
    if !top.is_empty() {
        println!("\nTop-level parts:");
        for (i, node) in top.iter().enumerate() {
            println!(
                "  {}: {}{}",
                i,
                node.name,
                if node.kind.is_assembly() { " (assembly)" } else { "" }
            );
        }
    }
    Ok(())
}

fn show_tree(store: &ProductStore, id: &String) -> Result<()> {
    let stored = store.load(id)?;
    let tree = &stored.product.tree;
    println!("{}", stored.product.title);
    for (depth, node) in tree.walk() {
        let path = tree.path_of(node.id).unwrap_or_default();
        let mut line = format!("{}{} [{}]", "  ".repeat(depth + 1), node.name, path);
        if node.price > 0.0 {
            line.push_str(&format!("  {:.2}", node.price));
        }
        if node.stock > 0 {
            line.push_str(&format!("  x{}", node.stock));
        }
        if node.kind.is_assembly() {
            line.push_str(&format!("  ({} subparts)", node.kind.children().len()));
        }
        println!("{line}");
    }
    Ok(())
}
