//! Generated toolchain configuration payloads.

use serde_json::{Value, json};

use crate::consts::{BUNDLED_JS_FILE_NAME, STAGING_DIR_NAME};

/// Template for webpack.config.js.
/// Contains {entry}, {filename} and {output_dir} placeholders for substitution.
pub const WEBPACK_CONFIG_TEMPLATE: &str = r#"const path = require("path");
module.exports = {
    entry: "{entry}",
    module: {
        rules: [
            {
                test: /\.tsx?$/,
                use: "ts-loader",
                exclude: /node_modules/,
            }
        ],
    },
    resolve: {
        extensions: [".ts", ".js"],
    },
    output: {
        filename: "{filename}",
        path: path.resolve(__dirname, "{output_dir}"),
    },
};
"#;

/// The npm manifest declaring the build script and its toolchain dependencies.
pub fn package_json() -> Value {
  json!({
    "name": "data-mapper-bundler",
    "version": "1.0.0",
    "scripts": {
      "build": "tsc && webpack"
    },
    "devDependencies": {
      "typescript": "^4.4.2",
      "webpack": "^5.52.0",
      "webpack-cli": "^4.8.0",
      "ts-loader": "^9.2.3"
    }
  })
}

/// Compiler options scoping compilation to the staging directory.
pub fn tsconfig_json() -> Value {
  json!({
    "compilerOptions": {
      "outDir": "./target",
      "module": "commonjs",
      "target": "es5",
      "sourceMap": true
    },
    "include": [format!("./{}/**/*", STAGING_DIR_NAME)]
  })
}

/// Bundler options pinning the entry point to the staged `<module>.ts`.
pub fn webpack_config(module_name: &str) -> String {
  // Always forward slashes: this is a JS string, not a host path.
  let entry = format!("./{}/{}.ts", STAGING_DIR_NAME, module_name);
  WEBPACK_CONFIG_TEMPLATE
    .replace("{entry}", &entry)
    .replace("{filename}", BUNDLED_JS_FILE_NAME)
    .replace("{output_dir}", STAGING_DIR_NAME)
}
