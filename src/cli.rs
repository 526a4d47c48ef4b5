use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "site-classify")]
#[command(about = "遺跡調査記録の焼石・焼土・文化類型・時期分類ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 遺跡一覧（CSV/XLSX）を分類して書き出す
    Classify {
        /// 入力ファイル（.csv / .xlsx）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル（デフォルト: 入力名_classified.csv）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 診断的遺物辞書（JSON）
        #[arg(long)]
        artifacts: Option<PathBuf>,

        /// 専門家データセット（CSV / JSON）
        #[arg(long)]
        expert: Option<PathBuf>,

        /// 語彙の上書きファイル（JSON）
        #[arg(long)]
        vocabulary: Option<PathBuf>,

        /// 記述テキストの列名
        #[arg(long)]
        text_column: Option<String>,

        /// トリノミアルの列名
        #[arg(long)]
        trinomial_column: Option<String>,

        /// テキスト列が無くても調査票の列を連結しない
        #[arg(long)]
        no_concat: bool,
    },

    /// 1件のテキストを分類してJSONで表示
    Text {
        /// 記述テキスト
        #[arg(required = true)]
        text: String,

        /// 専門家による時期分類
        #[arg(long)]
        refined_context: Option<String>,

        /// 診断的遺物辞書（JSON）
        #[arg(long)]
        artifacts: Option<PathBuf>,

        /// 語彙の上書きファイル（JSON）
        #[arg(long)]
        vocabulary: Option<PathBuf>,
    },

    /// 組み込み語彙をJSONで出力（編集用テンプレート）
    Vocab {
        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定の遺物辞書を設定
        #[arg(long)]
        set_artifacts: Option<PathBuf>,

        /// 既定の専門家データセットを設定
        #[arg(long)]
        set_expert: Option<PathBuf>,

        /// 既定の語彙ファイルを設定
        #[arg(long)]
        set_vocabulary: Option<PathBuf>,
    },
}

/// 出力先の既定値（入力と同じ場所に `_classified` を付ける）
pub fn default_output_path(input: &std::path::Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sites");
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("csv");
    input.with_file_name(format!("{}_classified.{}", stem, ext))
}
