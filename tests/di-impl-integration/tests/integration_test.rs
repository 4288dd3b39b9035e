//! 依赖注入容器的跨 crate 集成测试：并发查询和配置驱动的构建

use di_abstractions::{Autowired, BeanContext, Component, DefinitionBuilder};
use di_impl::{BeanContextImpl, ContextBuilder, FieldInspector};
use infrastructure_common::{ContextConfig, TypeInfo};
use std::io::Write;
use std::sync::{Arc, Barrier, Once};
use std::thread;

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

trait Repository: Send + Sync {
    fn find(&self, id: u64) -> String;
}

trait Notifier: Send + Sync {
    fn notify(&self, message: &str) -> usize;
}

#[derive(Default)]
struct InMemoryRepository;

impl Repository for InMemoryRepository {
    fn find(&self, id: u64) -> String {
        format!("campaign-{}", id)
    }
}

impl Component for InMemoryRepository {
    fn describe(definition: &mut DefinitionBuilder<Self>) {
        definition.provides::<dyn Repository>(|bean| bean as Arc<dyn Repository>);
    }
}

#[derive(Default)]
struct EmailNotifier;

impl Notifier for EmailNotifier {
    fn notify(&self, message: &str) -> usize {
        message.len()
    }
}

impl Component for EmailNotifier {
    fn describe(definition: &mut DefinitionBuilder<Self>) {
        definition.provides::<dyn Notifier>(|bean| bean as Arc<dyn Notifier>);
    }
}

/// 每个请求创建的处理器，通过 `inject` 装配
#[derive(Default)]
struct CampaignHandler {
    repository: Autowired<dyn Repository>,
    notifier: Autowired<dyn Notifier>,
}

impl CampaignHandler {
    fn handle(&self, id: u64) -> usize {
        let campaign = self.repository.find(id);
        self.notifier.notify(&campaign)
    }
}

impl Component for CampaignHandler {
    fn describe(definition: &mut DefinitionBuilder<Self>) {
        definition
            .autowired("repository", |bean| &bean.repository)
            .autowired("notifier", |bean| &bean.notifier);
    }
}

fn build_context(config: ContextConfig) -> Arc<BeanContextImpl> {
    let context = ContextBuilder::new()
        .with_config(config)
        .bean(Arc::new(InMemoryRepository))
        .bean(Arc::new(EmailNotifier))
        .build()
        .unwrap();
    Arc::new(context)
}

#[test]
fn test_concurrent_lazy_resolution_registers_once() {
    init_test_logger();
    let context = build_context(ContextConfig::default());
    let threads = 16;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let context = context.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                if i % 2 == 0 {
                    context.must_bean::<dyn Repository>().find(1)
                } else {
                    context.must_bean::<InMemoryRepository>().find(2)
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let repository = TypeInfo::of::<dyn Repository>();
    let concrete = TypeInfo::of::<InMemoryRepository>();
    assert_eq!(context.lookup(repository.qualified_name()).len(), 1);
    assert_eq!(context.lookup(concrete.qualified_name()).len(), 1);
}

#[test]
fn test_concurrent_inject() {
    init_test_logger();
    let context = build_context(ContextConfig::default());
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let context = context.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let handler = CampaignHandler::default();
                barrier.wait();
                context.inject(&handler).unwrap();
                handler.handle(i as u64)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "campaign-0".len());
    }
    assert!(context.inspector().contains(&TypeInfo::of::<CampaignHandler>()));
    assert_eq!(
        context
            .lookup(TypeInfo::of::<dyn Notifier>().qualified_name())
            .len(),
        1
    );
}

#[test]
fn test_context_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BeanContextImpl>();
    assert_send_sync::<FieldInspector>();
}

#[test]
fn test_shared_inspector_across_contexts() {
    init_test_logger();
    let inspector = Arc::new(FieldInspector::new());

    let first = ContextBuilder::new()
        .with_inspector(inspector.clone())
        .bean(Arc::new(InMemoryRepository))
        .build()
        .unwrap();
    let second = ContextBuilder::new()
        .with_inspector(inspector.clone())
        .bean(Arc::new(InMemoryRepository))
        .bean(Arc::new(EmailNotifier))
        .build()
        .unwrap();

    assert_eq!(inspector.len(), 2);
    assert!(Arc::ptr_eq(first.inspector(), second.inspector()));
}

#[test]
fn test_build_with_config_file() {
    init_test_logger();
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[context]\nname = \"campaign\"\nverbose = true").unwrap();

    let config = ContextConfig::load_file(file.path()).unwrap();
    let context = build_context(config);

    assert_eq!(context.config().name, "campaign");
    assert!(context.config().verbose);

    let handler = CampaignHandler::default();
    context.inject(&handler).unwrap();
    assert_eq!(handler.handle(7), "campaign-7".len());
}

#[test]
fn test_build_with_explicit_settings() {
    init_test_logger();
    let settings = config::Config::builder()
        .add_source(config::File::from_str(
            "context:\n  name: bidding\n",
            config::FileFormat::Yaml,
        ))
        .build()
        .unwrap();

    let config = ContextConfig::from_settings(&settings).unwrap();
    let context = build_context(config);

    assert_eq!(context.config().name, "bidding");
    assert!(!context.config().verbose);
    assert_eq!(context.len(), 2);
}
