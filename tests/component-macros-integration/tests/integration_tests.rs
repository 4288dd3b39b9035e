//! 派生宏与容器的端到端测试

use component_macros::Component;
use di_abstractions::{Autowired, BeanContext};
use di_impl::ContextBuilder;
use infrastructure_common::{BoxError, Closable, ContextError, Initializing, TypeInfo};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init()
            .ok();
    });
}

pub trait Storage: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
    fn store(&self, key: &str, value: &str);
}

pub trait CampaignService: Send + Sync {
    fn budget(&self, campaign: &str) -> u64;
    fn set_budget(&self, campaign: &str, budget: u64);
}

#[derive(Default, Component)]
pub struct AuditLog {
    entries: Mutex<Vec<String>>,
}

#[derive(Default, Component)]
#[component(provides(dyn Storage), closable)]
pub struct MemoryStorage {
    #[inject]
    audit: Autowired<AuditLog>,
    data: Mutex<HashMap<String, String>>,
    closed: AtomicBool,
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.data.lock().get(key).cloned()
    }

    fn store(&self, key: &str, value: &str) {
        self.audit.entries.lock().push(key.to_string());
        self.data.lock().insert(key.to_string(), value.to_string());
    }
}

impl Closable for MemoryStorage {
    fn close(&self) -> Result<(), BoxError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// 带前缀的存储装饰器，自身也是 Storage
#[derive(Default, Component)]
#[component(provides(dyn Storage, dyn CampaignService), post_construct)]
pub struct CampaignServiceImpl {
    #[inject(embedded)]
    storage: Autowired<dyn Storage>,
    ready: AtomicBool,
}

impl Storage for CampaignServiceImpl {
    fn load(&self, key: &str) -> Option<String> {
        self.storage.load(&format!("campaign:{}", key))
    }

    fn store(&self, key: &str, value: &str) {
        self.storage.store(&format!("campaign:{}", key), value)
    }
}

impl CampaignService for CampaignServiceImpl {
    fn budget(&self, campaign: &str) -> u64 {
        self.load(campaign)
            .and_then(|value| value.parse().ok())
            .unwrap_or(0)
    }

    fn set_budget(&self, campaign: &str, budget: u64) {
        self.store(campaign, &budget.to_string())
    }
}

impl Initializing for CampaignServiceImpl {
    fn post_construct(&self) -> Result<(), BoxError> {
        self.ready.store(self.storage.is_wired(), Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default, Component)]
pub struct BiddingHandler {
    #[inject]
    campaigns: Autowired<dyn CampaignService>,
    #[inject]
    audit: Autowired<AuditLog>,
}

#[test]
fn test_derived_components_are_wired() {
    init_test_logger();
    let audit = Arc::new(AuditLog::default());
    let storage = Arc::new(MemoryStorage::default());
    let campaigns = Arc::new(CampaignServiceImpl::default());

    let context = ContextBuilder::new()
        .bean(audit.clone())
        .bean(storage.clone())
        .bean(campaigns.clone())
        .build()
        .unwrap();

    assert!(campaigns.ready.load(Ordering::SeqCst));
    assert!(di_abstractions::same_instance(campaigns.storage.get().unwrap(), &storage));
    assert!(Arc::ptr_eq(storage.audit.get().unwrap(), &audit));

    // 装饰器内嵌 Storage，不会与 MemoryStorage 冲突
    let resolved = context.must_bean::<dyn Storage>();
    assert!(di_abstractions::same_instance(&resolved, &storage));

    let handler = BiddingHandler::default();
    context.inject(&handler).unwrap();
    handler.campaigns.set_budget("summer", 1200);

    assert_eq!(handler.campaigns.budget("summer"), 1200);
    assert_eq!(*audit.entries.lock(), vec!["campaign:summer"]);
    assert!(Arc::ptr_eq(handler.audit.get().unwrap(), &audit));

    context.close().unwrap();
    assert!(storage.closed.load(Ordering::SeqCst));
}

#[test]
fn test_derived_lookup_by_interface_name() {
    init_test_logger();
    let context = ContextBuilder::new()
        .bean(Arc::new(AuditLog::default()))
        .bean(Arc::new(MemoryStorage::default()))
        .bean(Arc::new(CampaignServiceImpl::default()))
        .bean(Arc::new(BiddingHandler::default()))
        .build()
        .unwrap();

    let name = TypeInfo::of::<dyn CampaignService>().qualified_name();
    let beans = context.lookup(name);

    assert_eq!(beans.len(), 1);
    assert!(beans[0].view::<CampaignServiceImpl>().is_some());
}

#[test]
fn test_derived_missing_dependency() {
    init_test_logger();

    let result = ContextBuilder::new()
        .bean(Arc::new(MemoryStorage::default()))
        .bean(Arc::new(BiddingHandler::default()))
        .build();

    match result {
        Err(ContextError::UnsatisfiedDependency { missing }) => {
            assert_eq!(missing.len(), 1);
            assert_eq!(missing[0].requesters.len(), 2);
        }
        other => panic!("expected UnsatisfiedDependency, got {:?}", other),
    }
}
