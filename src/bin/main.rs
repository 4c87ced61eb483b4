use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use polars::prelude::DataFrame;
use sales_analytics::config::{self, ApplicationConfig, LogConfig};
use sales_analytics::data_ingestion::validator::DateParsing;
use sales_analytics::data_ingestion::{CsvFileWriter, CsvReader};
use sales_analytics::pipeline::{
    forecast_frame, inventory_frame, metrics_frame, ForecastPipeline, InventoryPipeline,
    PipelineReport, ReportFormatter,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "sales_analytics", about = "銷售速度預測與 ABC 庫存分級工具")]
struct Cli {
    /// 配置文件（預設依 SALES_ENV 從 config/ 目錄載入）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 以指定的 chrono 格式解析銷售日期，例如 %d-%m-%y
    #[arg(long, global = true)]
    date_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// 將結果表格寫入 CSV
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 以 JSON 輸出結果與診斷
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 依線性趨勢預測各品項在目標日期的銷售量
    Forecast {
        /// 交易 CSV，可指定多個，以檔名作為來源標籤
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// 目標日期 (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_target_date)]
        date: NaiveDate,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// 計算庫存指標並做 ABC 分級
    Stock {
        /// 庫存 CSV
        #[arg(short, long)]
        input: PathBuf,

        /// 銷售期間（天）
        #[arg(long)]
        sales_duration: Option<f64>,

        /// 儲存期間（天）
        #[arg(long)]
        storage_duration: Option<f64>,

        /// 只計算庫存指標，不做 ABC 分級
        #[arg(long)]
        metrics_only: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
}

fn parse_target_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| format!("無效的日期 '{}': {}", value, e))
}

fn main() -> Result<()> {
    // 解析命令行參數
    let cli = Cli::parse();

    // 初始化配置
    let app_config = match &cli.config {
        Some(path) => config::manager::init_config_from_file(path)
            .with_context(|| format!("無法加載配置文件 {}", path.display()))?,
        None => config::init_config().context("無法加載應用程序配置")?,
    };

    // 初始化日誌系統
    init_logging(&app_config.log)?;

    let mut app_config = app_config.clone();
    if let Some(format) = &cli.date_format {
        app_config.pipeline.date_parsing = DateParsing::Explicit(format.clone());
    }

    match cli.command {
        Commands::Forecast {
            input,
            date,
            output,
        } => run_forecast(&app_config, &input, date, &output),
        Commands::Stock {
            input,
            sales_duration,
            storage_duration,
            metrics_only,
            output,
        } => {
            let sales_duration = sales_duration
                .or(app_config.pipeline.sales_duration)
                .ok_or_else(|| anyhow!("請指定 --sales-duration 或在配置中設定 pipeline.sales_duration"))?;
            let storage_duration = storage_duration
                .or(app_config.pipeline.storage_duration)
                .ok_or_else(|| anyhow!("請指定 --storage-duration 或在配置中設定 pipeline.storage_duration"))?;
            run_stock(
                &app_config,
                &input,
                sales_duration,
                storage_duration,
                metrics_only,
                &output,
            )
        }
    }
}

fn run_forecast(
    app_config: &ApplicationConfig,
    input: &[PathBuf],
    date: NaiveDate,
    output: &OutputArgs,
) -> Result<()> {
    let frames = CsvReader::default()
        .load_many(input)
        .context("無法讀取交易檔案")?;

    info!("開始預測 {} 個檔案，目標日期 {}", frames.len(), date);
    let result = ForecastPipeline::from_config(app_config)
        .run_many(&frames, date)
        .context("預測失敗")?;

    let mut table = forecast_frame(&result.items)?;
    emit(
        &mut table,
        &result.report,
        json!({ "target_date": result.target_date, "items": result.items }),
        output,
    )
}

fn run_stock(
    app_config: &ApplicationConfig,
    input: &Path,
    sales_duration: f64,
    storage_duration: f64,
    metrics_only: bool,
    output: &OutputArgs,
) -> Result<()> {
    let source = CsvReader::default()
        .read_file(input)
        .with_context(|| format!("無法讀取庫存檔案 {}", input.display()))?;
    let pipeline = InventoryPipeline::from_config(app_config)?;

    if metrics_only {
        let result = pipeline
            .run_metrics(&source, sales_duration, storage_duration)
            .context("庫存指標計算失敗")?;
        let mut table = metrics_frame(&source, &result.records)?;
        let records: Vec<_> = result.records.iter().map(|(_, m)| m).collect();
        return emit(&mut table, &result.report, json!({ "records": records }), output);
    }

    let result = pipeline
        .run(&source, sales_duration, storage_duration)
        .context("ABC 分析失敗")?;
    let mut table = inventory_frame(&source, &result.records)?;
    emit(
        &mut table,
        &result.report,
        json!({ "records": result.records }),
        output,
    )
}

fn emit(
    table: &mut DataFrame,
    report: &PipelineReport,
    payload: serde_json::Value,
    output: &OutputArgs,
) -> Result<()> {
    if let Some(path) = &output.output {
        CsvFileWriter::default()
            .write_file(table, path)
            .with_context(|| format!("無法寫入 {}", path.display()))?;
        info!("結果已寫入 {}", path.display());
    }

    if output.json {
        let document = json!({ "result": payload, "report": report });
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        println!("{}", table);
        println!("{}", ReportFormatter::format_text(report));
    }
    Ok(())
}

// 初始化日誌系統
fn init_logging(log_config: &LogConfig) -> Result<()> {
    let level = match log_config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO, // 默認為INFO
    };

    let builder = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_max_level(level)
        .with_writer(std::io::stderr);

    let result = if log_config.format.eq_ignore_ascii_case("json") {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.pretty().finish())
    };
    result.map_err(|e| anyhow!("設置日誌系統失敗: {}", e))?;

    info!("日誌系統初始化完成");
    Ok(())
}
