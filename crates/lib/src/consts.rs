//! Fixed names and versions shared across the pipeline.

/// Directory under the resources root that holds one subdirectory per data mapper.
pub const DATA_MAPPER_DIR_PATH: &str = "datamapper";

/// Extension of the source files that get staged and compiled.
pub const SOURCE_EXTENSION: &str = "ts";

// Generated and transient paths, relative to the working directory.
pub const STAGING_DIR_NAME: &str = "data-mapper";
pub const BUNDLED_JS_FILE_NAME: &str = "bundle.js";
pub const PACKAGE_JSON_FILE_NAME: &str = "package.json";
pub const PACKAGE_LOCK_FILE_NAME: &str = "package-lock.json";
pub const TS_CONFIG_FILE_NAME: &str = "tsconfig.json";
pub const WEBPACK_CONFIG_FILE_NAME: &str = "webpack.config.js";
pub const NODE_DIR_NAME: &str = "node";
pub const NODE_MODULES_DIR_NAME: &str = "node_modules";
pub const TARGET_DIR_NAME: &str = "target";
pub const POM_FILE_NAME: &str = "pom.xml";

pub const NODE_VERSION: &str = "v18.20.4";
pub const NPM_VERSION: &str = "10.7.0";

pub const INSTALL_NODE_AND_NPM_GOAL: &str = "com.github.eirslett:frontend-maven-plugin:1.15.0:install-node-and-npm";
pub const NPM_GOAL: &str = "com.github.eirslett:frontend-maven-plugin:1.15.0:npm";
pub const EXEC_GOAL: &str = "org.codehaus.mojo:exec-maven-plugin:3.1.0:exec";
pub const NPM_COMMAND: &str = "npm";
pub const NPM_INSTALL: &str = "install";
pub const RUN_BUILD: &str = "run build";

/// Line prefix in `mvn -v` output that carries the Maven installation directory.
pub const MAVEN_HOME_MARKER: &str = "Maven home: ";

/// Overrides the `mvn` executable used for probing and step invocation.
pub const MVN_ENV_VAR: &str = "DMBUNDLE_MVN";
