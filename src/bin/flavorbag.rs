use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "flavorbag", version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Client config JSON.
    #[arg(long, global = true, env = "FLAVORBAG_CONFIG")]
    config: Option<PathBuf>,

    /// API host (overrides the config file).
    #[arg(long, global = true, env = "FLAVORBAG_API")]
    api_base: Option<String>,

    /// Directory root-relative assets resolve against (overrides the config file).
    #[arg(long, global = true, env = "FLAVORBAG_WEB_ROOT")]
    web_root: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the bag list and render gallery thumbnails into a directory.
    Gallery(GalleryArgs),
    /// Render one bag JSON to a PNG without contacting the API.
    Render(RenderArgs),
    /// Render a label texture as a PNG.
    Label(LabelArgs),
    /// Contain-fit an image into an image-slot texture PNG.
    Contain(ContainArgs),
    /// Log in and store the user session.
    Login(LoginArgs),
    /// Submit a new bag.
    Submit(SubmitArgs),
    /// Vote for a bag as the stored user.
    Vote(BagIdArgs),
    /// Delete a bag.
    Delete(BagIdArgs),
}

#[derive(Parser, Debug)]
struct GalleryArgs {
    /// Output directory for card PNGs.
    #[arg(long)]
    out: PathBuf,

    /// Number of pages to render.
    #[arg(long, default_value_t = 1)]
    pages: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ViewChoice {
    Thumbnail,
    Configurator,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Bag JSON file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// View preset.
    #[arg(long, value_enum, default_value_t = ViewChoice::Thumbnail)]
    view: ViewChoice,

    /// Configurator preview width.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Configurator preview height.
    #[arg(long, default_value_t = 600)]
    height: u32,
}

#[derive(Parser, Debug)]
struct LabelArgs {
    /// Label text.
    #[arg(long)]
    text: String,

    /// Text colour: white or black.
    #[arg(long, default_value = "white")]
    fill: String,

    /// Font: standard, decorative or classic.
    #[arg(long, default_value = "standard")]
    font: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ContainArgs {
    /// Source image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct LoginArgs {
    /// User name.
    #[arg(long)]
    username: String,

    /// Password.
    #[arg(long, env = "FLAVORBAG_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Parser, Debug)]
struct SubmitArgs {
    /// Flavor name printed on the bag.
    #[arg(long)]
    name: String,

    /// Description (defaults to the name).
    #[arg(long)]
    flavor: Option<String>,

    /// Body colour as hex.
    #[arg(long)]
    colour: Option<String>,

    /// Text colour: white or black.
    #[arg(long, default_value = "white")]
    text_colour: String,

    /// Font: standard, decorative or classic.
    #[arg(long, default_value = "standard")]
    font: String,

    /// Image file to print on the bag.
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct BagIdArgs {
    /// Bag id.
    #[arg(long)]
    bag_id: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.global)?;
    match cli.cmd {
        Command::Gallery(args) => cmd_gallery(&config, args).await,
        Command::Render(args) => cmd_render(&config, args).await,
        Command::Label(args) => cmd_label(&config, args),
        Command::Contain(args) => cmd_contain(args),
        Command::Login(args) => cmd_login(&config, args).await,
        Command::Submit(args) => cmd_submit(&config, args).await,
        Command::Vote(args) => cmd_vote(&config, args).await,
        Command::Delete(args) => cmd_delete(&config, args).await,
    }
}

fn load_config(global: &GlobalArgs) -> anyhow::Result<flavorbag::ClientConfig> {
    let mut config = flavorbag::ClientConfig::load_or_default(global.config.as_deref())?;
    if let Some(api) = &global.api_base {
        config.api_base = api.clone();
    }
    if let Some(root) = &global.web_root {
        config.web_root = root.clone();
    }
    Ok(config)
}

fn write_png(path: &Path, img: &flavorbag::RasterImage) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let png = flavorbag::encode_png(img)?;
    std::fs::write(path, png).with_context(|| format!("write png '{}'", path.display()))?;
    eprintln!("wrote {} ({:016x})", path.display(), img.fingerprint());
    Ok(())
}

fn thumbnails(
    config: &flavorbag::ClientConfig,
    display: Arc<dyn flavorbag::CardDisplay>,
) -> anyhow::Result<flavorbag::ThumbnailRenderer<flavorbag::HttpAssetFetcher>> {
    let fetch = Arc::new(flavorbag::HttpAssetFetcher::new(&config.web_root)?);
    let text = flavorbag::TextCompositor::with_font_dirs(&config.font_search_dirs());
    let renderer = flavorbag::ThumbnailRenderer::new(
        fetch,
        config.model_source.clone(),
        text,
        Arc::new(flavorbag::FlatRenderer::new()),
        display,
    )
    .with_placeholder(config.placeholder_image.clone())
    .with_slot_names(config.slot_names.clone());
    Ok(renderer)
}

async fn cmd_gallery(config: &flavorbag::ClientConfig, args: GalleryArgs) -> anyhow::Result<()> {
    let display = Arc::new(flavorbag::PngDirDisplay::new(&args.out)?);
    let thumbs = Arc::new(thumbnails(config, display.clone())?);
    let api = flavorbag::ApiClient::new(config.api_base.clone())?;
    let gallery = flavorbag::Gallery::new(api, thumbs, config.user_store())
        .with_page_size(config.page_size);

    let mut handles = gallery
        .load()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    for _ in 1..args.pages {
        if !gallery.load_more().enabled {
            break;
        }
        handles.extend(gallery.render_next_page());
    }
    for h in handles {
        h.await.context("card task panicked")?;
    }

    for (id, title) in display.titles() {
        println!("{}\t{}", display.card_path(id).display(), title);
    }
    eprintln!(
        "{} of {} bags rendered ({})",
        display.titles().len(),
        gallery.bag_count(),
        gallery.load_more().label
    );
    Ok(())
}

async fn cmd_render(config: &flavorbag::ClientConfig, args: RenderArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read bag '{}'", args.in_path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text).context("parse bag JSON")?;
    let bag = flavorbag::parse_bag_record(&value)
        .ok_or_else(|| anyhow::anyhow!("'{}' is not a bag object", args.in_path.display()))?;

    let view = match args.view {
        ViewChoice::Thumbnail => flavorbag::ViewSetup::thumbnail(),
        ViewChoice::Configurator => flavorbag::ViewSetup::configurator(args.width, args.height),
    };
    let display = Arc::new(flavorbag::InMemoryDisplay::new());
    let thumbs = thumbnails(config, display.clone())?.with_view(view);

    let state = thumbs.run_card(&bag).await;
    if state != flavorbag::ThumbState::Settled {
        anyhow::bail!("bag could not be rendered ({state:?})");
    }
    let frame = display
        .cards()
        .into_iter()
        .find_map(|(_, card)| card.frame)
        .ok_or_else(|| anyhow::anyhow!("no frame presented"))?;
    write_png(&args.out, &frame.into_raster()?)
}

fn cmd_label(config: &flavorbag::ClientConfig, args: LabelArgs) -> anyhow::Result<()> {
    let text = flavorbag::TextCompositor::with_font_dirs(&config.font_search_dirs());
    let img = text.render_text_label(
        &args.text,
        flavorbag::TextFill::parse_lenient(Some(&args.fill)),
        flavorbag::FontAlias::parse_lenient(Some(&args.font)),
    )?;
    write_png(&args.out, &img)
}

fn cmd_contain(args: ContainArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;
    let src = flavorbag::decode_image(&bytes)?;
    let img = flavorbag::render_contained_image(&src)?;
    write_png(&args.out, &img)
}

async fn cmd_login(config: &flavorbag::ClientConfig, args: LoginArgs) -> anyhow::Result<()> {
    let api = flavorbag::ApiClient::new(config.api_base.clone())?;
    let session = api
        .login(&args.username, &args.password)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let store = config.user_store();
    store.save(&session)?;
    eprintln!(
        "logged in as {} (session stored in {})",
        session.username,
        store.path().display()
    );
    Ok(())
}

async fn cmd_submit(config: &flavorbag::ClientConfig, args: SubmitArgs) -> anyhow::Result<()> {
    let mut session = flavorbag::ConfiguratorSession::new();
    session.set_name(args.name);
    if let Some(flavor) = args.flavor {
        session.set_flavor(flavor);
    }
    if let Some(colour) = &args.colour {
        session.set_custom_colour(colour)?;
    }
    session.set_text_fill(flavorbag::TextFill::parse_lenient(Some(&args.text_colour)));
    session.set_font(flavorbag::FontAlias::parse_lenient(Some(&args.font)));
    if let Some(path) = &args.image {
        session.attach_image_file(path)?;
    }

    let api = flavorbag::ApiClient::new(config.api_base.clone())?;
    let result = session.submit(&api).await;
    eprintln!("{}", session.status());
    let saved = result.map_err(|e| anyhow::anyhow!(e.user_message()))?;
    if let Some(id) = saved.id {
        println!("{id}");
    }
    Ok(())
}

async fn cmd_vote(config: &flavorbag::ClientConfig, args: BagIdArgs) -> anyhow::Result<()> {
    let user = config
        .user_store()
        .load()?
        .ok_or_else(|| anyhow::anyhow!(flavorbag::NOT_LOGGED_IN))?;
    let user_id = user
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| anyhow::anyhow!(flavorbag::USER_ID_MISSING))?;

    let api = flavorbag::ApiClient::new(config.api_base.clone())?;
    api.vote(&args.bag_id, &user_id)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    eprintln!("vote registered for {}", args.bag_id);
    Ok(())
}

async fn cmd_delete(config: &flavorbag::ClientConfig, args: BagIdArgs) -> anyhow::Result<()> {
    let api = flavorbag::ApiClient::new(config.api_base.clone())?;
    api.delete_bag(&args.bag_id)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    eprintln!("deleted {}", args.bag_id);
    Ok(())
}
