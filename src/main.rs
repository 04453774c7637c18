use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use salesdash::{
    config::DashboardConfig,
    dashboard::{Dashboard, Selection},
    export,
    filter::CategoryFilter,
    present::{JsonPresenter, TextPresenter},
};
use std::{io, path::PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Sales dashboard: KPIs and charts for a CSV or spreadsheet sales file"
)]
struct Args {
    /// Sales file; `.csv`/`.txt` are read as delimited text, anything else as a spreadsheet
    file: PathBuf,
    /// YAML file with dashboard settings
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    delimiter: Option<char>,
    /// Text encoding label for delimited files, e.g. latin1 or utf-8
    #[arg(long)]
    encoding: Option<String>,
    #[arg(long = "region")]
    regions: Vec<String>,
    #[arg(long = "state")]
    states: Vec<String>,
    #[arg(long = "city")]
    cities: Vec<String>,
    /// First invoice date to include (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Last invoice date to include (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Save the filtered CSV download here
    #[arg(long)]
    download_dir: Option<PathBuf>,
    /// Also write the filtered rows as Parquet
    #[arg(long)]
    parquet: Option<PathBuf>,
    #[arg(long)]
    show_table: bool,
    /// Print the values available for each filter and exit
    #[arg(long)]
    list_options: bool,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_yaml_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(d) = args.delimiter {
        config.delimiter = d;
    }
    if let Some(e) = &args.encoding {
        config.encoding = e.clone();
    }
    config.show_table |= args.show_table;

    let dashboard = match Dashboard::open(&args.file, config) {
        Ok(d) => d,
        Err(err) => {
            error!("{err:#}");
            return Err(err);
        }
    };
    if dashboard.dropped_rows() > 0 {
        warn!(
            dropped = dashboard.dropped_rows(),
            "rows with the wrong number of fields were skipped"
        );
    }

    if args.list_options {
        let options = dashboard.filter_options();
        println!("Regions: {}", options.regions.join(", "));
        println!("States:  {}", options.states.join(", "));
        println!("Cities:  {}", options.cities.join(", "));
        return Ok(());
    }

    let selection = Selection {
        categories: CategoryFilter::default()
            .with_regions(args.regions)
            .with_states(args.states)
            .with_cities(args.cities),
        start: args.start,
        end: args.end,
    };

    let filtered = match args.format {
        OutputFormat::Text => {
            let stdout = io::stdout();
            let mut presenter = TextPresenter::new(stdout.lock());
            if let Some(dir) = &args.download_dir {
                presenter = presenter.with_download_dir(dir);
            }
            println!("{}", dashboard.config().title);
            dashboard.render(&selection, &mut presenter)?
        }
        OutputFormat::Json => {
            let mut presenter = JsonPresenter::new(dashboard.config().title.clone());
            let filtered = dashboard.render(&selection, &mut presenter)?;
            presenter.write_to(io::stdout().lock())?;
            println!();
            filtered
        }
    };

    if let Some(path) = &args.parquet {
        export::write_parquet(&filtered, path)?;
        info!(path = %path.display(), rows = filtered.len(), "parquet written");
    }
    Ok(())
}
