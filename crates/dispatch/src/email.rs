//! Email-template adapter: registers contributed template sets with the
//! host's template store.

use tracing::debug;

use ferrule_registry::{CapabilityKind, CapabilityPayload, EmailTemplate, PluginRegistry};

use crate::adapter::DispatcherAdapter;

/// Boundary to the template store.
pub trait TemplateSink {
    fn add(&mut self, plugin_id: &str, template: &EmailTemplate);
}

/// Registers every enabled template set at mailer initialization.
pub struct TemplateMounter<S: TemplateSink> {
    sink: S,
}

impl<S: TemplateSink> TemplateMounter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: TemplateSink> DispatcherAdapter for TemplateMounter<S> {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::EmailTemplate
    }

    fn wire(&mut self, registry: &PluginRegistry) -> anyhow::Result<()> {
        for descriptor in registry.get_by_kind(CapabilityKind::EmailTemplate) {
            if let CapabilityPayload::EmailTemplate(set) = descriptor.payload() {
                for template in &set.templates {
                    self.sink.add(descriptor.id(), template);
                }
                debug!(
                    plugin = descriptor.id(),
                    templates = set.templates.len(),
                    "registered plugin email templates"
                );
            }
        }
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use ferrule_registry::{PluginDescriptor, TemplateSet};

    #[derive(Default)]
    struct RecordingSink {
        added: Vec<(String, String)>,
    }

    impl TemplateSink for RecordingSink {
        fn add(&mut self, plugin_id: &str, template: &EmailTemplate) {
            self.added
                .push((plugin_id.to_string(), template.name.clone()));
        }
    }

    fn template_descriptor(id: &str, names: &[&str]) -> PluginDescriptor {
        let set = TemplateSet {
            templates: names
                .iter()
                .map(|name| EmailTemplate {
                    name: (*name).to_string(),
                    subject: format!("[{name}]"),
                    body: String::new(),
                })
                .collect(),
        };
        PluginDescriptor::new(id, id, CapabilityPayload::EmailTemplate(set))
    }

    #[test]
    fn registers_all_templates_from_all_sets() {
        let registry = PluginRegistry::new();
        registry
            .register(template_descriptor("notify", &["welcome", "digest"]))
            .unwrap();
        registry
            .register(template_descriptor("alerts", &["incident"]))
            .unwrap();

        let mut mounter = TemplateMounter::new(RecordingSink::default());
        mounter.wire(&registry).unwrap();

        let sink = mounter.into_sink();
        assert_eq!(sink.added.len(), 3);
        assert!(sink
            .added
            .contains(&("alerts".to_string(), "incident".to_string())));
    }
}
