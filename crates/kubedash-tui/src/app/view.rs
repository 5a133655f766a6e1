use kubedash_types::Kind;

/// An entry of the overview menu
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Resources(Kind),
    VolumeBindings,
    TopNodes,
    TopPods,
}

impl View {
    /// Menu entries in display order
    pub const MENU: [View; 16] = [
        View::Resources(Kind::Node),
        View::Resources(Kind::Namespace),
        View::Resources(Kind::Pod),
        View::Resources(Kind::Deployment),
        View::Resources(Kind::StatefulSet),
        View::Resources(Kind::Service),
        View::Resources(Kind::Secret),
        View::Resources(Kind::StorageClass),
        View::Resources(Kind::PersistentVolume),
        View::Resources(Kind::PersistentVolumeClaim),
        View::VolumeBindings,
        View::Resources(Kind::CustomResourceDefinition),
        View::Resources(Kind::ClusterRole),
        View::Resources(Kind::ClusterRoleBinding),
        View::TopNodes,
        View::TopPods,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Resources(kind) => kind.label(),
            Self::VolumeBindings => "Volume Bindings",
            Self::TopNodes => "Top Nodes",
            Self::TopPods => "Top Pods",
        }
    }

    /// Whether the namespace scope narrows this view
    pub fn is_namespaced(&self) -> bool {
        match self {
            Self::Resources(kind) => kind.is_namespaced(),
            Self::VolumeBindings | Self::TopPods => true,
            Self::TopNodes => false,
        }
    }
}
