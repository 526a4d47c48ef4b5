use clap::Parser;
use site_classifier::{batch, build_classifier, cli, config, error, load_experts, table};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use site_classifier_common::{Record, Vocabulary};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("エラー: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Classify {
            input,
            output,
            artifacts,
            expert,
            vocabulary,
            text_column,
            trinomial_column,
            no_concat,
        } => {
            println!("🪨 site-classify - 遺跡記述の分類\n");
            let config = Config::load()?;

            // 1. 語彙・辞書
            println!("[1/3] 語彙と参照テーブルを読み込み中...");
            let classifier =
                build_classifier(&config, vocabulary.as_deref(), artifacts.as_deref())?;
            let experts = load_experts(expert.as_deref().or(config.expert_dataset.as_deref()));
            println!("✔ 専門家分類 {}件\n", experts.len());

            // 2. 分類
            println!("[2/3] 分類中...");
            let input_table = table::read_table(&input)?;
            println!("- {}行を読み込み", input_table.len());
            let options = batch::BatchOptions {
                text_column: text_column.unwrap_or_else(|| config.text_column.clone()),
                trinomial_column: trinomial_column
                    .unwrap_or_else(|| config.trinomial_column.clone()),
                concat: !no_concat,
                progress: true,
            };
            let (output_table, summary) =
                batch::classify_table(&input_table, &classifier, &experts, &options)?;
            println!("✔ 分類完了\n");

            // 3. 書き出し
            println!("[3/3] 結果を保存中...");
            let output = output.unwrap_or_else(|| cli::default_output_path(&input));
            table::write_table(&output_table, &output)?;
            println!("✔ 結果を保存: {}", output.display());

            println!("\n集計:");
            println!("  行数: {}", summary.rows);
            println!("  Class 1（焼石散布）: {}", summary.class_1);
            println!("  Class 2（炉跡）: {}", summary.class_2);
            println!("  Class 3（土坑炉・マウンド）: {}", summary.class_3);
            println!(
                "  焼土: {}（焼土のみ: {}）",
                summary.burned_clay, summary.burned_clay_only
            );
            println!("  Caddo: {} / Henrietta: {}", summary.caddo, summary.henrietta);
            println!("  先史: {}", summary.prehistoric);
            println!("  専門家分類の適用: {}", summary.expert_overrides);

            println!("\n✅ 完了");
        }

        Commands::Text {
            text,
            refined_context,
            artifacts,
            vocabulary,
        } => {
            let config = Config::load()?;
            let classifier =
                build_classifier(&config, vocabulary.as_deref(), artifacts.as_deref())?;
            let record = Record {
                text,
                refined_context,
            };
            let result = classifier.classify(&record);
            println!("{}", serde_json::to_string_pretty(&result.view())?);
        }

        Commands::Vocab { output } => {
            let json = Vocabulary::default().to_json_pretty()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("✔ 語彙を出力: {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Config {
            show,
            set_artifacts,
            set_expert,
            set_vocabulary,
        } => {
            // 壊れた設定ファイルもここで上書きして直せるようにする
            let mut config = Config::load_or_default();
            let changed =
                set_artifacts.is_some() || set_expert.is_some() || set_vocabulary.is_some();

            if let Some(path) = set_artifacts {
                config.artifact_db = Some(path);
            }
            if let Some(path) = set_expert {
                config.expert_dataset = Some(path);
            }
            if let Some(path) = set_vocabulary {
                config.vocabulary = Some(path);
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                let display = |p: &Option<std::path::PathBuf>| {
                    p.as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".into())
                };
                println!("設定:");
                println!("  遺物辞書: {}", display(&config.artifact_db));
                println!("  専門家データセット: {}", display(&config.expert_dataset));
                println!("  語彙ファイル: {}", display(&config.vocabulary));
                println!("  テキスト列: {}", config.text_column);
                println!("  トリノミアル列: {}", config.trinomial_column);
                println!("  誤字補正キャッシュ上限: {}", config.typo_cache_capacity);
            }
        }
    }

    Ok(())
}
