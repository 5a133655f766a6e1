//! Joins between normalized collections

use std::collections::HashMap;

use kubedash_types::{AttrValue, Kind, NO_MATCHING_PV, NOT_APPLICABLE, NormalizedRecord, VolumeBinding};

/// Owner kinds a pod can be correlated through
const CORRELATED_OWNER_KINDS: [&str; 2] = ["ReplicaSet", "StatefulSet"];

/// Controller kinds scanned into the owner index, in precedence order
const CONTROLLER_SCAN_ORDER: [Kind; 3] = [Kind::ReplicaSet, Kind::Deployment, Kind::StatefulSet];

/// Replica counts of one controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplicaCounts {
    pub desired: i64,
    pub ready: i64,
}

/// Controller name -> replica counts. Built once, read-only afterwards.
#[derive(Debug, Default)]
pub struct OwnerIndex {
    counts: HashMap<String, ReplicaCounts>,
}

impl OwnerIndex {
    /// Scan replica sets, then deployments, then stateful sets. The first
    /// controller seen with a given name wins.
    pub fn build(controllers: &[NormalizedRecord]) -> Self {
        let mut counts = HashMap::new();

        for kind in CONTROLLER_SCAN_ORDER {
            for controller in controllers.iter().filter(|c| c.kind == kind) {
                let count = |key: &str| {
                    controller
                        .attr(key)
                        .and_then(AttrValue::as_count)
                        .unwrap_or(0)
                };
                counts
                    .entry(controller.name.clone())
                    .or_insert(ReplicaCounts {
                        desired: count("desired_replicas"),
                        ready: count("ready_replicas"),
                    });
            }
        }

        Self { counts }
    }

    pub fn get(&self, controller: &str) -> Option<ReplicaCounts> {
        self.counts.get(controller).copied()
    }
}

/// Attach `desired_replicas`/`ready_replicas` to each pod from its first
/// ReplicaSet or StatefulSet owner. Pods without a known owner get "N/A".
///
/// Only the immediate owner is consulted: a Deployment's pods resolve
/// through their ReplicaSet's own counts.
pub fn correlate_owner(
    pods: Vec<NormalizedRecord>,
    controllers: &[NormalizedRecord],
) -> Vec<NormalizedRecord> {
    let index = OwnerIndex::build(controllers);

    pods.into_iter()
        .map(|mut pod| {
            let counts = pod
                .owner_references
                .iter()
                .find(|o| CORRELATED_OWNER_KINDS.contains(&o.kind.as_str()))
                .and_then(|o| index.get(&o.name));

            match counts {
                Some(c) => {
                    pod.set_attr("desired_replicas", c.desired);
                    pod.set_attr("ready_replicas", c.ready);
                }
                None => {
                    pod.set_attr("desired_replicas", AttrValue::not_applicable());
                    pod.set_attr("ready_replicas", AttrValue::not_applicable());
                }
            }
            pod
        })
        .collect()
}

/// Join every PVC to the PV named by its `volume_name`. Unmatched claims are
/// kept with "No matching PV" and "N/A" on the volume side.
pub fn correlate_pv_pvc(pvs: &[NormalizedRecord], pvcs: &[NormalizedRecord]) -> Vec<VolumeBinding> {
    let volumes: HashMap<&str, &NormalizedRecord> = pvs
        .iter()
        .filter(|pv| pv.kind == Kind::PersistentVolume)
        .map(|pv| (pv.name.as_str(), pv))
        .collect();

    pvcs.iter()
        .map(|pvc| {
            let pv = pvc
                .attr("volume_name")
                .and_then(AttrValue::as_text)
                .and_then(|name| volumes.get(name));

            match pv {
                Some(pv) => VolumeBinding {
                    pvc_name: pvc.name.clone(),
                    pvc_namespace: pvc.namespace.clone(),
                    pvc_status: pvc.status.clone(),
                    pv_name: pv.name.clone(),
                    pv_status: pv.status.clone(),
                    capacity: pv.attr_display("capacity"),
                    storage_class: pv.attr_display("storage_class"),
                },
                None => VolumeBinding {
                    pvc_name: pvc.name.clone(),
                    pvc_namespace: pvc.namespace.clone(),
                    pvc_status: pvc.status.clone(),
                    pv_name: NO_MATCHING_PV.to_string(),
                    pv_status: NOT_APPLICABLE.to_string(),
                    capacity: NOT_APPLICABLE.to_string(),
                    storage_class: NOT_APPLICABLE.to_string(),
                },
            }
        })
        .collect()
}

/// Attach per-namespace `pods`, `deployments` and `services` counts
pub fn correlate_namespace_counts(
    namespaces: Vec<NormalizedRecord>,
    pods: &[NormalizedRecord],
    deployments: &[NormalizedRecord],
    services: &[NormalizedRecord],
) -> Vec<NormalizedRecord> {
    fn tally(records: &[NormalizedRecord]) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for r in records {
            *counts.entry(r.namespace.as_str()).or_insert(0) += 1;
        }
        counts
    }

    let pod_counts = tally(pods);
    let deployment_counts = tally(deployments);
    let service_counts = tally(services);

    namespaces
        .into_iter()
        .map(|mut ns| {
            let name = ns.name.clone();
            let lookup = |counts: &HashMap<&str, usize>| counts.get(name.as_str()).copied().unwrap_or(0);
            ns.set_attr("pods", lookup(&pod_counts));
            ns.set_attr("deployments", lookup(&deployment_counts));
            ns.set_attr("services", lookup(&service_counts));
            ns
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubedash_types::OwnerRef;

    fn controller(kind: Kind, name: &str, desired: i64, ready: i64) -> NormalizedRecord {
        NormalizedRecord::new(kind, name, Some("prod".to_string()), format!("Replicas: {}", desired))
            .with_attr("desired_replicas", desired)
            .with_attr("ready_replicas", ready)
    }

    fn pod_owned_by(name: &str, owners: &[(&str, &str)]) -> NormalizedRecord {
        let mut pod = NormalizedRecord::new(Kind::Pod, name, Some("prod".to_string()), "Running");
        pod.owner_references = owners.iter().map(|(k, n)| OwnerRef::new(*k, *n)).collect();
        pod
    }

    fn pv(name: &str, status: &str) -> NormalizedRecord {
        NormalizedRecord::new(Kind::PersistentVolume, name, None, status)
            .with_attr("capacity", "10Gi")
            .with_attr("storage_class", "standard")
    }

    fn pvc(name: &str, volume: &str) -> NormalizedRecord {
        NormalizedRecord::new(Kind::PersistentVolumeClaim, name, Some("db".to_string()), "Bound")
            .with_attr("volume_name", volume)
    }

    #[test]
    fn test_pod_gets_replica_set_counts() {
        let pods = vec![pod_owned_by("rs-a-xyz", &[("ReplicaSet", "rs-a")])];
        let controllers = vec![controller(Kind::ReplicaSet, "rs-a", 3, 2)];

        let out = correlate_owner(pods, &controllers);
        assert_eq!(out[0].attr("desired_replicas"), Some(&AttrValue::Count(3)));
        assert_eq!(out[0].attr("ready_replicas"), Some(&AttrValue::Count(2)));
    }

    #[test]
    fn test_pod_without_matching_owner_is_na() {
        let pods = vec![
            pod_owned_by("orphan", &[]),
            pod_owned_by("other", &[("ReplicaSet", "rs-missing")]),
            pod_owned_by("job-pod", &[("Job", "rs-a")]),
        ];
        let controllers = vec![controller(Kind::ReplicaSet, "rs-a", 3, 2)];

        for pod in correlate_owner(pods, &controllers) {
            assert_eq!(pod.attr_display("desired_replicas"), NOT_APPLICABLE);
            assert_eq!(pod.attr_display("ready_replicas"), NOT_APPLICABLE);
        }
    }

    #[test]
    fn test_first_correlated_owner_is_used() {
        let pods = vec![pod_owned_by(
            "db-0",
            &[("Node", "worker-1"), ("StatefulSet", "db"), ("ReplicaSet", "rs-a")],
        )];
        let controllers = vec![
            controller(Kind::ReplicaSet, "rs-a", 5, 5),
            controller(Kind::StatefulSet, "db", 3, 1),
        ];

        let out = correlate_owner(pods, &controllers);
        assert_eq!(out[0].attr("desired_replicas"), Some(&AttrValue::Count(3)));
        assert_eq!(out[0].attr("ready_replicas"), Some(&AttrValue::Count(1)));
    }

    #[test]
    fn test_owner_index_first_match_wins() {
        // Same name across kinds: replica sets take precedence regardless of slice order
        let controllers = vec![
            controller(Kind::StatefulSet, "shared", 9, 9),
            controller(Kind::Deployment, "shared", 4, 4),
            controller(Kind::ReplicaSet, "shared", 1, 0),
        ];
        let index = OwnerIndex::build(&controllers);
        assert_eq!(index.get("shared"), Some(ReplicaCounts { desired: 1, ready: 0 }));
    }

    #[test]
    fn test_pvc_joined_to_pv() {
        let bindings = correlate_pv_pvc(&[pv("pv-1", "Bound")], &[pvc("data", "pv-1")]);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].pv_name, "pv-1");
        assert_eq!(bindings[0].pv_status, "Bound");
        assert_eq!(bindings[0].capacity, "10Gi");
        assert_eq!(bindings[0].pvc_namespace, "db");
    }

    #[test]
    fn test_unmatched_pvc_is_kept() {
        let unbound = NormalizedRecord::new(
            Kind::PersistentVolumeClaim,
            "pending",
            Some("db".to_string()),
            "Pending",
        )
        .with_attr("volume_name", AttrValue::not_applicable());

        let bindings = correlate_pv_pvc(
            &[pv("pv-1", "Bound")],
            &[pvc("data", "pv-missing"), unbound],
        );
        assert_eq!(bindings.len(), 2);
        for b in &bindings {
            assert_eq!(b.pv_name, NO_MATCHING_PV);
            assert_eq!(b.pv_status, NOT_APPLICABLE);
            assert_eq!(b.capacity, NOT_APPLICABLE);
        }
        assert_eq!(bindings[1].pvc_status, "Pending");
    }

    #[test]
    fn test_namespace_counts() {
        let namespaces = vec![
            NormalizedRecord::new(Kind::Namespace, "prod", None, "Active"),
            NormalizedRecord::new(Kind::Namespace, "empty", None, "Active"),
        ];
        let pods = vec![
            pod_owned_by("a", &[]),
            pod_owned_by("b", &[]),
        ];
        let deployments = vec![controller(Kind::Deployment, "api", 1, 1)];

        let out = correlate_namespace_counts(namespaces, &pods, &deployments, &[]);
        assert_eq!(out[0].attr("pods"), Some(&AttrValue::Count(2)));
        assert_eq!(out[0].attr("deployments"), Some(&AttrValue::Count(1)));
        assert_eq!(out[0].attr("services"), Some(&AttrValue::Count(0)));
        assert_eq!(out[1].attr("pods"), Some(&AttrValue::Count(0)));
    }
}
