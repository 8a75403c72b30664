// In-memory collaborators for dashboard tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use url::Url;

use crate::backend::{Backend, FormOutcome};
use crate::config::DashboardConfig;
use crate::controller::Dashboard;
use crate::error::CoreError;
use crate::model::{
    DeviceForm, DeviceId, DeviceStatus, DiscoveredDevice, DiscoverySession, MacAddress,
    ManagedDevice, StatusMap,
};
use crate::render::{Notice, Notifier, Renderer};

// ── Fixtures ────────────────────────────────────────────────────────

pub(crate) fn session(active: bool, devices: &[(&str, &str, bool)]) -> DiscoverySession {
    let devices: Vec<DiscoveredDevice> = devices
        .iter()
        .map(|(mac, ip, already_imported)| DiscoveredDevice {
            mac: MacAddress::new(mac),
            ip: (*ip).to_owned(),
            already_imported: *already_imported,
        })
        .collect();
    DiscoverySession {
        active,
        count: devices.len(),
        devices,
    }
}

pub(crate) fn managed(id: &str, name: &str) -> ManagedDevice {
    ManagedDevice {
        id: DeviceId::from(id),
        name: name.into(),
        mac: MacAddress::new("AA:BB:CC:DD:EE:FF"),
        ip: Some("192.168.1.10".into()),
        description: None,
        last_wake: None,
    }
}

pub(crate) fn unreachable() -> CoreError {
    CoreError::Transport {
        reason: "connection refused".into(),
    }
}

// ── Backend ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Statuses,
    ListDevices,
    StartDiscovery,
    StopDiscovery,
    DiscoveryStatus,
    Create(DeviceForm),
    /// A create request finished, by MAC.
    Created(String),
    Wake(DeviceId),
    Delete(DeviceId),
    Update(DeviceId, DeviceForm),
}

struct FakeState {
    calls: Vec<Call>,
    devices: Result<Vec<ManagedDevice>, CoreError>,
    statuses: Result<StatusMap, CoreError>,
    start: Result<(), CoreError>,
    stop: Result<(), CoreError>,
    /// Consumed front to back; the last entry repeats.
    discovery: VecDeque<Result<DiscoverySession, CoreError>>,
    discovery_delay: Option<Duration>,
    form_outcome: FormOutcome,
    unreachable_macs: HashSet<String>,
    create_delays: HashMap<String, Duration>,
}

pub(crate) struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                calls: Vec::new(),
                devices: Ok(Vec::new()),
                statuses: Ok(StatusMap::new()),
                start: Ok(()),
                stop: Ok(()),
                discovery: VecDeque::from([Ok(DiscoverySession::default())]),
                discovery_delay: None,
                form_outcome: FormOutcome::Redirected {
                    location: Some("/".into()),
                },
                unreachable_macs: HashSet::new(),
                create_delays: HashMap::new(),
            }),
        }
    }

    pub(crate) fn set_devices(&self, devices: Result<Vec<ManagedDevice>, CoreError>) {
        self.state.lock().unwrap().devices = devices;
    }

    pub(crate) fn set_statuses(&self, statuses: Result<StatusMap, CoreError>) {
        self.state.lock().unwrap().statuses = statuses;
    }

    pub(crate) fn set_start(&self, result: Result<(), CoreError>) {
        self.state.lock().unwrap().start = result;
    }

    pub(crate) fn set_stop(&self, result: Result<(), CoreError>) {
        self.state.lock().unwrap().stop = result;
    }

    pub(crate) fn script_discovery(
        &self,
        responses: impl IntoIterator<Item = Result<DiscoverySession, CoreError>>,
    ) {
        self.state.lock().unwrap().discovery = responses.into_iter().collect();
    }

    pub(crate) fn set_discovery_delay(&self, delay: Duration) {
        self.state.lock().unwrap().discovery_delay = Some(delay);
    }

    pub(crate) fn set_form_outcome(&self, outcome: FormOutcome) {
        self.state.lock().unwrap().form_outcome = outcome;
    }

    pub(crate) fn unreachable_for(&self, mac: &str) {
        self.state.lock().unwrap().unreachable_macs.insert(mac.into());
    }

    pub(crate) fn delay_create(&self, mac: &str, delay: Duration) {
        self.state.lock().unwrap().create_delays.insert(mac.into(), delay);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state.lock().unwrap().calls.iter().filter(|c| pred(c)).count()
    }

    pub(crate) fn created(&self) -> Vec<DeviceForm> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create(form) => Some(form),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn device_statuses(&self) -> Result<StatusMap, CoreError> {
        self.record(Call::Statuses);
        self.state.lock().unwrap().statuses.clone()
    }

    async fn list_devices(&self) -> Result<Vec<ManagedDevice>, CoreError> {
        self.record(Call::ListDevices);
        self.state.lock().unwrap().devices.clone()
    }

    async fn start_discovery(&self) -> Result<(), CoreError> {
        self.record(Call::StartDiscovery);
        self.state.lock().unwrap().start.clone()
    }

    async fn stop_discovery(&self) -> Result<(), CoreError> {
        self.record(Call::StopDiscovery);
        self.state.lock().unwrap().stop.clone()
    }

    async fn discovery_status(&self) -> Result<DiscoverySession, CoreError> {
        self.record(Call::DiscoveryStatus);
        let (response, delay) = {
            let mut state = self.state.lock().unwrap();
            let response = if state.discovery.len() > 1 {
                state.discovery.pop_front().unwrap()
            } else {
                state.discovery.front().cloned().unwrap()
            };
            (response, state.discovery_delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        response
    }

    async fn create_device(&self, form: &DeviceForm) -> Result<FormOutcome, CoreError> {
        self.record(Call::Create(form.clone()));
        let delay = self.state.lock().unwrap().create_delays.get(&form.mac).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(Call::Created(form.mac.clone()));
        let state = self.state.lock().unwrap();
        if state.unreachable_macs.contains(&form.mac) {
            return Err(unreachable());
        }
        Ok(state.form_outcome.clone())
    }

    async fn wake_device(&self, id: &DeviceId) -> Result<FormOutcome, CoreError> {
        self.record(Call::Wake(id.clone()));
        Ok(self.state.lock().unwrap().form_outcome.clone())
    }

    async fn delete_device(&self, id: &DeviceId) -> Result<FormOutcome, CoreError> {
        self.record(Call::Delete(id.clone()));
        Ok(self.state.lock().unwrap().form_outcome.clone())
    }

    async fn update_device(
        &self,
        id: &DeviceId,
        form: &DeviceForm,
    ) -> Result<FormOutcome, CoreError> {
        self.record(Call::Update(id.clone(), form.clone()));
        Ok(self.state.lock().unwrap().form_outcome.clone())
    }
}

// ── Renderer ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Rendered {
    DeviceList(Vec<DeviceId>),
    Discovery(DiscoverySession),
    Status(IndexMap<DeviceId, DeviceStatus>),
    ClearDiscovered,
    OpenImportForm(DeviceForm),
    CloseImportForm,
    DiscoveryView(bool),
}

#[derive(Default)]
pub(crate) struct RecordingRenderer {
    events: Mutex<Vec<Rendered>>,
}

impl RecordingRenderer {
    pub(crate) fn events(&self) -> Vec<Rendered> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn discoveries(&self) -> Vec<DiscoverySession> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Rendered::Discovery(session) => Some(session),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn last_discovery(&self) -> Option<DiscoverySession> {
        self.discoveries().pop()
    }

    pub(crate) fn last_status(&self) -> Option<IndexMap<DeviceId, DeviceStatus>> {
        self.events().into_iter().rev().find_map(|e| match e {
            Rendered::Status(map) => Some(map),
            _ => None,
        })
    }

    fn push(&self, event: Rendered) {
        self.events.lock().unwrap().push(event);
    }
}

impl Renderer for RecordingRenderer {
    fn render_device_list(&self, devices: &[ManagedDevice]) {
        self.push(Rendered::DeviceList(devices.iter().map(|d| d.id.clone()).collect()));
    }

    fn render_discovery(&self, session: &DiscoverySession) {
        self.push(Rendered::Discovery(session.clone()));
    }

    fn render_status(&self, indicators: &IndexMap<DeviceId, DeviceStatus>) {
        self.push(Rendered::Status(indicators.clone()));
    }

    fn clear_discovered(&self) {
        self.push(Rendered::ClearDiscovered);
    }

    fn open_import_form(&self, form: &DeviceForm) {
        self.push(Rendered::OpenImportForm(form.clone()));
    }

    fn close_import_form(&self) {
        self.push(Rendered::CloseImportForm);
    }

    fn set_discovery_view(&self, visible: bool) {
        self.push(Rendered::DiscoveryView(visible));
    }
}

// ── Notifier ────────────────────────────────────────────────────────

pub(crate) struct ScriptedNotifier {
    answer: bool,
    notices: Mutex<Vec<Notice>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedNotifier {
    pub(crate) fn answering(answer: bool) -> Self {
        Self {
            answer,
            notices: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for ScriptedNotifier {
    async fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        self.answer
    }
}

// ── Harness ─────────────────────────────────────────────────────────

pub(crate) struct Harness {
    pub dashboard: Dashboard,
    pub backend: Arc<FakeBackend>,
    pub renderer: Arc<RecordingRenderer>,
    pub notifier: Arc<ScriptedNotifier>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_answer(true)
    }

    pub(crate) fn with_answer(answer: bool) -> Self {
        let backend = Arc::new(FakeBackend::new());
        let renderer = Arc::new(RecordingRenderer::default());
        let notifier = Arc::new(ScriptedNotifier::answering(answer));
        let config = DashboardConfig::new(Url::parse("http://127.0.0.1:5000/").unwrap());
        let dashboard = Dashboard::new(
            config,
            Arc::clone(&backend) as Arc<dyn Backend>,
            Arc::clone(&renderer) as Arc<dyn Renderer>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
        );
        Self {
            dashboard,
            backend,
            renderer,
            notifier,
        }
    }
}
