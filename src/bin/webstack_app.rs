use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use clap::Parser;
use log::info;
use serde::Deserialize;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::env;
use std::error::Error;
use std::fs::{self, OpenOptions};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use webstack::modules::agents::AgentPool;
use webstack::modules::browser::{BROWSERS, BrowserStack, StartForm, StartOptions};
use webstack::modules::devices::{BREAKPOINTS, Breakpoint, CUSTOM_DEVICE, DEVICES, DevicePreset};
use webstack::modules::serialize::{AppConfig, load_config_or_default};
use webstack::modules::spider::{HrefSpider, Spider};
use webstack::modules::types::{CrawlReport, StackReport};

#[derive(Clone)]
struct AppState {
    config: AppConfig,
    agents: Arc<AgentPool>,
    stack: Arc<Mutex<BrowserStack>>,
    log_path: PathBuf,
}

#[derive(Parser)]
#[command(
    name = "webstack_app",
    version,
    about = "Spider form and browser control panel",
    long_about = None
)]
struct Cli {
    #[arg(short = 'l', long = "log-file", default_value = "webstack.log")]
    log_file: String,

    #[arg(short = 'c', long = "config", default_value = "./webstack.toml")]
    config: String,
}

fn init_logger(log_path: &str) -> Result<(), Box<dyn Error>> {
    WriteLogger::init(
        LevelFilter::Info,
        ConfigBuilder::new()
            .set_time_format_rfc3339()
            .build(),
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?,
    )?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logger(&cli.log_file).expect("logger init failed");

    let config = load_config_or_default(&cli.config).expect("bad configuration");

    let port = env::var("WEBSTACK_APP_PORT")
        .ok()
        .and_then(|val| val.parse::<u16>().ok())
        .unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", config.server.host, port)
        .parse()
        .expect("bad server address");

    let state = AppState {
        agents: Arc::new(AgentPool::new(config.spider.user_agents.clone())),
        stack: Arc::new(Mutex::new(BrowserStack::new(
            config.browser.webdriver_url.clone(),
        ))),
        log_path: PathBuf::from(cli.log_file),
        config,
    };

    let app = Router::new()
        .route("/", get(index))
        .route("/api/spider", post(api_spider))
        .route("/api/browser/start", post(start_browser))
        .route("/api/browser/stop", get(stop_browser))
        .route("/api/browser/options", get(browser_options))
        .route("/api/log", get(get_log))
        .with_state(state);

    println!("Webstack app running on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind port");
    axum::serve(listener, app)
        .await
        .expect("server error");
}

async fn index() -> Html<String> {
    Html(index_html())
}

#[derive(Deserialize)]
struct CrawlQuery {
    #[serde(default)]
    url: String,
}

async fn api_spider(
    State(state): State<AppState>,
    Form(query): Form<CrawlQuery>,
) -> Result<Json<CrawlReport>, ApiError> {
    if query.url.is_empty() {
        return Err(ApiError::bad_request("url field is required"));
    }
    info!("Spider request for {}", query.url);

    let spider = HrefSpider::new(
        state.agents.pick(),
        Duration::from_secs(state.config.spider.timeout_secs),
    );
    let url = query.url;
    let report = tokio::task::spawn_blocking(move || {
        spider.crawl(&url).map_err(|err| err.to_string())
    })
    .await
    .map_err(|err| ApiError::internal(err.to_string()))?
    .map_err(ApiError::internal)?;

    Ok(Json(report))
}

async fn start_browser(
    State(state): State<AppState>,
    Form(form): Form<StartForm>,
) -> Result<Json<StackReport>, ApiError> {
    info!("Start request: {form:?}");

    let fallback = format!(
        "http://{}:{}",
        state.config.server.host, state.config.server.port
    );
    let options = StartOptions::resolve(&form, &fallback, state.config.browser.panel_height)
        .map_err(|err| ApiError::bad_request(&err.to_string()))?;

    state
        .stack
        .lock()
        .await
        .start(options)
        .await
        .map_err(|err| ApiError::bad_gateway(err.to_string()))?;

    Ok(Json(StackReport {
        status: "started".to_string(),
    }))
}

async fn stop_browser(State(state): State<AppState>) -> Result<Json<StackReport>, ApiError> {
    info!("Stop request");

    state
        .stack
        .lock()
        .await
        .stop()
        .await
        .map_err(|err| ApiError::bad_gateway(err.to_string()))?;

    Ok(Json(StackReport {
        status: "stopped".to_string(),
    }))
}

#[derive(serde::Serialize)]
struct PanelOptions {
    browsers: &'static [&'static str],
    devices: &'static [DevicePreset],
    breakpoints: &'static [Breakpoint],
    custom_device: &'static str,
}

async fn browser_options() -> Json<PanelOptions> {
    Json(PanelOptions {
        browsers: BROWSERS,
        devices: DEVICES,
        breakpoints: BREAKPOINTS,
        custom_device: CUSTOM_DEVICE,
    })
}

async fn get_log(State(state): State<AppState>) -> Result<String, ApiError> {
    let text = match fs::read_to_string(&state.log_path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(ApiError::internal(err.to_string())),
    };
    Ok(limit_tail(&text, 20000))
}

fn limit_tail(text: &str, max_chars: usize) -> String {
    if text.len() <= max_chars {
        return text.to_string();
    }
    let start = text.len() - max_chars;
    text[start..].to_string()
}

#[derive(Debug)]
struct ApiError {
    code: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: &str) -> Self {
        Self {
            code: StatusCode::BAD_REQUEST,
            message: message.to_string(),
        }
    }

    fn bad_gateway(message: String) -> Self {
        Self {
            code: StatusCode::BAD_GATEWAY,
            message,
        }
    }

    fn internal(message: String) -> Self {
        Self {
            code: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.code, self.message).into_response()
    }
}

fn index_html() -> String {
    let html = r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Webstack</title>
  <style>
    :root {
      --bg: #0f172a;
      --panel-2: #111827;
      --accent: #f59e0b;
      --text: #e2e8f0;
      --muted: #94a3b8;
      --border: rgba(148, 163, 184, 0.2);
      --danger: #ef4444;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      font-family: "Trebuchet MS", "Verdana", "Geneva", sans-serif;
      color: var(--text);
      background: radial-gradient(circle at top, #1e293b, #0b1020 55%, #090c18);
      min-height: 100vh;
    }

    header {
      padding: 24px 20px 12px;
    }

    header h1 {
      margin: 0 0 6px;
      font-size: 28px;
      letter-spacing: 0.5px;
    }

    header p {
      margin: 0;
      color: var(--muted);
      font-size: 14px;
    }

    .shell {
      padding: 0 16px 32px;
      max-width: 960px;
      margin: 0 auto;
      display: grid;
      gap: 16px;
    }

    .panel {
      background: linear-gradient(145deg, rgba(15, 23, 42, 0.9), rgba(17, 24, 39, 0.95));
      border: 1px solid var(--border);
      border-radius: 18px;
      padding: 20px;
    }

    .panel h2 {
      margin: 0 0 14px;
      font-size: 20px;
    }

    .panel-header {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    .fields {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 12px;
    }

    .field label {
      display: block;
      font-size: 12px;
      color: var(--muted);
      margin-bottom: 6px;
    }

    .field input,
    .field select {
      width: 100%;
      padding: 10px 12px;
      border-radius: 10px;
      border: 1px solid transparent;
      background: var(--panel-2);
      color: var(--text);
    }

    .field input:disabled {
      color: var(--muted);
    }

    .field input:focus,
    .field select:focus {
      outline: none;
      border-color: var(--accent);
    }

    .breakpoints {
      display: flex;
      gap: 14px;
      flex-wrap: wrap;
      margin-top: 12px;
      color: var(--muted);
      font-size: 13px;
    }

    .actions {
      display: flex;
      gap: 10px;
      flex-wrap: wrap;
      margin-top: 14px;
    }

    .btn {
      border: 1px solid transparent;
      padding: 10px 16px;
      border-radius: 12px;
      cursor: pointer;
      font-weight: 600;
      background: var(--accent);
      color: #1f2937;
    }

    .btn.secondary {
      background: transparent;
      color: var(--text);
      border-color: var(--border);
    }

    .btn.danger {
      background: var(--danger);
      color: #111827;
    }

    .log-box {
      background: #0b1020;
      border-radius: 12px;
      padding: 14px;
      border: 1px solid var(--border);
      color: #d1d5db;
      font-family: "Courier New", monospace;
      font-size: 12px;
      white-space: pre-wrap;
      max-height: 320px;
      overflow-y: auto;
      margin: 14px 0 0;
    }
  </style>
</head>
<body>
  <header>
    <div class="shell">
      <h1>Webstack</h1>
      <p>Crawl a page for its outbound links, or drive a sized browser session.</p>
    </div>
  </header>
  <div class="shell">
    <div class="panel">
      <h2>Spider</h2>
      <form id="spider-form">
        <div class="fields">
          <div class="field">
            <label>URL</label>
            <input type="text" name="url" placeholder="https://example.com" required />
          </div>
        </div>
        <div class="actions">
          <button class="btn" type="submit">Crawl</button>
        </div>
      </form>
      <pre class="log-box" id="spider-result">No crawl yet.</pre>
    </div>

    <div class="panel">
      <h2>Browser panel</h2>
      <form id="browser-form">
        <div class="fields">
          <div class="field">
            <label>Browser</label>
            <select name="browser"></select>
          </div>
          <div class="field">
            <label>Device</label>
            <select name="device"></select>
          </div>
          <div class="field">
            <label>Height</label>
            <input type="number" name="height" disabled />
          </div>
          <div class="field">
            <label>Width</label>
            <input type="number" name="width" disabled />
          </div>
          <div class="field">
            <label>Target URL</label>
            <input type="text" name="url" placeholder="blank opens this app" />
          </div>
        </div>
        <div class="breakpoints" id="breakpoints"></div>
        <div class="actions">
          <button class="btn" type="submit">Start</button>
          <button class="btn danger" type="reset">Stop</button>
        </div>
      </form>
    </div>

    <div class="panel">
      <div class="panel-header">
        <h2>Log</h2>
        <button class="btn secondary" type="button" id="refresh-log">Refresh log</button>
      </div>
      <pre class="log-box" id="log-box"></pre>
    </div>
  </div>

  <script>
    const form = document.getElementById("browser-form");
    const logBox = document.getElementById("log-box");
    let options = { browsers: [], devices: [], breakpoints: [], custom_device: "custom" };

    function logLine(text) {
      console.log(text);
      logBox.textContent += text + "\n";
      logBox.scrollTop = logBox.scrollHeight;
    }

    function sizeInputs() {
      return [form.elements.height, form.elements.width];
    }

    function lockSizes(height, width) {
      form.elements.height.value = height;
      form.elements.width.value = width;
      for (const input of sizeInputs()) {
        input.disabled = true;
        input.required = false;
      }
    }

    function onDevice(name) {
      for (const radio of form.querySelectorAll('input[name="breakpoint"]')) {
        radio.checked = false;
      }
      if (name === options.custom_device) {
        for (const input of sizeInputs()) {
          input.value = "";
          input.disabled = false;
          input.required = true;
        }
        return;
      }
      const preset = options.devices.find(device => device.name === name);
      if (preset) {
        lockSizes(preset.height, preset.width);
      } else {
        lockSizes("", "");
      }
    }

    function onBreakpoint(name) {
      form.elements.device.value = "";
      lockSizes("", "");
      logLine(`breakpoint: ${name}`);
    }

    form.addEventListener("change", event => {
      switch (event.target.name) {
        case "browser":
          logLine(`browser: ${event.target.value}`);
          break;
        case "device":
          onDevice(event.target.value);
          break;
        case "breakpoint":
          onBreakpoint(event.target.value);
          break;
        default:
          logLine(`change from unhandled field: ${event.target.name}`);
      }
    });

    form.addEventListener("submit", async event => {
      event.preventDefault();
      const payload = new URLSearchParams(new FormData(form));
      if (!payload.has("height")) payload.append("height", form.elements.height.value);
      if (!payload.has("width")) payload.append("width", form.elements.width.value);
      const response = await fetch("/api/browser/start", { method: "POST", body: payload });
      logLine(await response.text());
    });

    form.addEventListener("reset", async event => {
      event.preventDefault();
      const response = await fetch("/api/browser/stop");
      logLine(await response.text());
    });

    async function crawl(payload) {
      const response = await fetch("/api/spider", { method: "POST", body: payload });
      return response.json();
    }

    document.getElementById("spider-form").addEventListener("submit", async event => {
      event.preventDefault();
      const result = await crawl(new URLSearchParams(new FormData(event.target)));
      console.log(result);
      document.getElementById("spider-result").textContent = JSON.stringify(result, null, 2);
    });

    document.getElementById("refresh-log").addEventListener("click", async () => {
      const response = await fetch("/api/log");
      logBox.textContent = await response.text();
      logBox.scrollTop = logBox.scrollHeight;
    });

    function renderOptions() {
      form.elements.browser.innerHTML = options.browsers
        .map(name => `<option value="${name}">${name}</option>`)
        .join("");
      const names = options.devices.map(device => device.name).concat(options.custom_device);
      form.elements.device.innerHTML =
        `<option value="">none</option>` +
        names.map(name => `<option value="${name}">${name}</option>`).join("");
      document.getElementById("breakpoints").innerHTML = options.breakpoints
        .map(bp => `<label><input type="radio" name="breakpoint" value="${bp.name}" /> ${bp.name} (${bp.width}px)</label>`)
        .join("");
    }

    async function boot() {
      const response = await fetch("/api/browser/options");
      options = await response.json();
      renderOptions();
    }

    boot();
  </script>
</body>
</html>"##;

    html.to_string()
}
