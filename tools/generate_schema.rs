//! JSON Schema + Markdown生成ツール
//!
//! src/domain/config.rsの設定構造から以下を自動生成します：
//! 1. JSON Schema (schema/config.json)
//! 2. Markdownドキュメント (CONFIGURATION.md)
//!
//! 実行方法:
//! ```
//! cargo run --bin generate_schema
//! ```

use handmouse::domain::config::AppConfig;
use schemars::schema_for;
use serde_json::{Map, Value};
use std::fs;

fn main() {
    println!("JSON Schema + Markdown生成中...");

    let schema = schema_for!(AppConfig);
    let json = serde_json::to_string_pretty(&schema).expect("Failed to serialize schema to JSON");

    fs::create_dir_all("schema").expect("Failed to create schema/ directory");
    fs::write("schema/config.json", &json).expect("Failed to write schema/config.json");
    println!("  ✓ schema/config.json");

    let schema_value: Value = serde_json::from_str(&json).expect("Failed to parse generated schema");
    let markdown = generate_markdown(&schema_value);

    fs::write("CONFIGURATION.md", markdown).expect("Failed to write CONFIGURATION.md");
    println!("  ✓ CONFIGURATION.md");

    println!("✅ 生成完了: schema/config.json + CONFIGURATION.md");
}

/// JSON Schemaからマークダウンドキュメントを生成
fn generate_markdown(schema: &Value) -> String {
    let mut md = String::new();

    md.push_str("# 設定リファレンス (Configuration Reference)\n\n");
    md.push_str("## 概要\n\n");
    md.push_str("`config.toml`ファイルは、handmouseの動作を制御する設定ファイルです。\n\n");
    md.push_str("**設定ファイルの場所**: `config.toml` (プロジェクトルート)  \n");
    md.push_str("**スキーマファイル**: `schema/config.json` (自動生成)  \n");
    md.push_str("**サンプル**: `config.toml.example`\n\n");
    md.push_str("⚠️ **注意**: このドキュメント（CONFIGURATION.md）は `cargo run --bin generate_schema` で自動生成されます。\n");
    md.push_str("設定項目の説明を変更する場合は、`src/domain/config.rs`のdoc commentsを編集してください。\n\n");
    md.push_str("## 設定ファイルの読み込み\n\n");
    md.push_str("- `config.toml`が存在する場合: ファイルから読み込み\n");
    md.push_str("- ファイルが存在しない場合: デフォルト値を使用（警告ログ出力）\n\n");
    md.push_str("## 設定項目\n\n");

    let defs = schema
        .get("$defs")
        .and_then(|d| d.as_object())
        .cloned()
        .unwrap_or_default();

    if let Some(props) = schema.get("properties").and_then(|p| p.as_object()) {
        for (key, prop) in props {
            md.push_str(&format!("### [{}] - {}\n\n", key, section_name(key)));

            if let Some(desc) = prop.get("description").and_then(|d| d.as_str()) {
                md.push_str(&format!("{}\n\n", desc));
            }

            // $refをたどって定義本体のプロパティテーブルを出す
            if let Some(def) = resolve_ref(prop, &defs) {
                properties_table(&mut md, def);
            } else if prop.get("properties").is_some() {
                properties_table(&mut md, prop);
            }
        }
    }

    md.push_str("## 参考\n\n");
    md.push_str("- [README.md](README.md) - クイックスタート\n");

    md
}

/// $refが指す$defsの定義を引く
fn resolve_ref<'a>(schema: &Value, defs: &'a Map<String, Value>) -> Option<&'a Value> {
    let ref_str = schema.get("$ref")?.as_str()?;
    let def_name = ref_str.strip_prefix("#/$defs/")?;
    defs.get(def_name)
}

/// プロパティテーブルを生成
fn properties_table(md: &mut String, schema: &Value) {
    let props = match schema.get("properties").and_then(|p| p.as_object()) {
        Some(props) if !props.is_empty() => props,
        _ => return,
    };

    md.push_str("| 設定項目 | 型 | デフォルト | 説明 |\n");
    md.push_str("|---------|-----|---------|---------|\n");

    for (prop_key, prop_schema) in props {
        md.push_str(&format!(
            "| `{}` | {} | {} | {} |\n",
            prop_key,
            type_string(prop_schema),
            default_value(prop_schema),
            description(prop_schema)
        ));
    }
    md.push('\n');
}

/// 型を文字列で取得
fn type_string(schema: &Value) -> String {
    match schema.get("type").and_then(|t| t.as_str()) {
        Some("integer") | Some("number") => schema
            .get("format")
            .and_then(|f| f.as_str())
            .unwrap_or("number")
            .to_string(),
        Some("boolean") => "bool".to_string(),
        Some(other) => other.to_string(),
        None => "unknown".to_string(),
    }
}

/// デフォルト値を取得
fn default_value(schema: &Value) -> String {
    match schema.get("default") {
        Some(Value::String(s)) => format!("`\"{}\"`", s),
        Some(Value::Number(n)) => format!("`{}`", n),
        Some(Value::Bool(b)) => format!("`{}`", b),
        _ => "-".to_string(),
    }
}

/// 説明文を取得（改行を<br>に、パイプをエスケープ）
fn description(schema: &Value) -> String {
    match schema.get("description").and_then(|d| d.as_str()) {
        Some(desc) => desc
            .replace("\n\n", "<br><br>")
            .replace('\n', " ")
            .replace('|', "\\|"),
        None => "-".to_string(),
    }
}

/// セクション名をフォーマット
fn section_name(key: &str) -> String {
    match key {
        "camera" => "カメラ設定".to_string(),
        "tracking" => "カーソル移動設定".to_string(),
        "gesture" => "ジェスチャ認識設定".to_string(),
        "pipeline" => "パイプライン設定".to_string(),
        _ => key.to_string(),
    }
}
