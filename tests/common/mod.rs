#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use spark_testing_library::{h, Component, ComponentType, Props, VNode};

/// Route library logs to the test output. Set `RUST_LOG=spark_testing_library=trace` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Counts mounts and unmounts of every instance it creates.
#[derive(Clone, Default)]
pub struct Lifecycle {
    pub mounts: Rc<Cell<u32>>,
    pub unmounts: Rc<Cell<u32>>,
}

struct Tracked {
    lifecycle: Lifecycle,
}

impl Component for Tracked {
    fn render(&self, props: &Props) -> VNode {
        h("span")
            .child(props.get("label").unwrap_or("tracked").to_string())
            .into()
    }

    fn did_mount(&self) {
        let mounts = &self.lifecycle.mounts;
        mounts.set(mounts.get() + 1);
    }

    fn will_unmount(&self) {
        let unmounts = &self.lifecycle.unmounts;
        unmounts.set(unmounts.get() + 1);
    }
}

impl Lifecycle {
    pub fn component(&self) -> ComponentType {
        let lifecycle = self.clone();
        ComponentType::new("Tracked", move || Tracked {
            lifecycle: lifecycle.clone(),
        })
    }
}
