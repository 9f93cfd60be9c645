use clap::{Parser, Subcommand, ValueEnum};
use receipt_common::Locale;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "receipt-scanner")]
#[command(about = "レシート画像をアップロードして解析結果を表示", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// レシート画像をアップロードして結果を表示
    Upload {
        /// レシート画像ファイル
        file: Option<PathBuf>,

        /// サーバーのURL（例: http://127.0.0.1:5000）
        #[arg(short, long)]
        endpoint: Option<String>,

        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (html/text)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// 表示言語 (ru/en)
        #[arg(long, value_parser = parse_locale)]
        lang: Option<Locale>,
    },

    /// 保存済みのサーバーレスポンスを表示
    Render {
        /// レスポンスJSON、またはdata部分だけのファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (html/text)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// 表示言語 (ru/en)
        #[arg(long, value_parser = parse_locale)]
        lang: Option<Locale>,
    },

    /// 設定を管理
    Config {
        /// サーバーのURLを設定
        #[arg(long)]
        endpoint: Option<String>,

        /// 既定の表示言語を設定 (ru/en)
        #[arg(long, value_parser = parse_locale)]
        lang: Option<Locale>,

        /// リクエストのタイムアウト秒数（0で無効）
        #[arg(long)]
        timeout: Option<u64>,

        /// 現在の設定を表示
        #[arg(short, long)]
        show: bool,
    },
}

/// 出力形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    #[default]
    Text,
}

pub fn parse_locale(s: &str) -> Result<Locale, String> {
    match s.to_lowercase().as_str() {
        "ru" => Ok(Locale::Ru),
        "en" => Ok(Locale::En),
        _ => Err(format!("Unknown language: {}. Use ru or en", s)),
    }
}
