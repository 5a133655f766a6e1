use kubedash_types::{Kind, NormalizedRecord, UsageRecord, VolumeBinding};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::ui::Theme;

const MAX_COLUMN_WIDTH: usize = 48;

/// Where a table cell takes its value from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Name,
    Namespace,
    Status,
    Attr(&'static str),
}

/// Columns shown for each kind, after NAME
pub fn columns(kind: Kind) -> &'static [(&'static str, Column)] {
    use Column::*;
    match kind {
        Kind::Node => &[
            ("STATUS", Status),
            ("ROLES", Attr("roles")),
            ("VERSION", Attr("kubelet_version")),
            ("INTERNAL-IP", Attr("internal_ip")),
            ("CPU", Attr("cpu_capacity")),
            ("MEMORY", Attr("memory_capacity")),
            ("AGE", Attr("age")),
        ],
        Kind::Namespace => &[
            ("STATUS", Status),
            ("PODS", Attr("pods")),
            ("DEPLOYMENTS", Attr("deployments")),
            ("SERVICES", Attr("services")),
            ("AGE", Attr("age")),
        ],
        Kind::Pod => &[
            ("NAMESPACE", Namespace),
            ("STATUS", Status),
            ("READY", Attr("ready")),
            ("RESTARTS", Attr("restarts")),
            ("OWNER DESIRED", Attr("desired_replicas")),
            ("OWNER READY", Attr("ready_replicas")),
            ("NODE", Attr("node")),
            ("AGE", Attr("age")),
        ],
        Kind::Deployment => &[
            ("NAMESPACE", Namespace),
            ("STATUS", Status),
            ("READY", Attr("ready_replicas")),
            ("AVAILABLE", Attr("available_replicas")),
            ("STRATEGY", Attr("strategy")),
            ("AGE", Attr("age")),
        ],
        Kind::StatefulSet | Kind::ReplicaSet => &[
            ("NAMESPACE", Namespace),
            ("STATUS", Status),
            ("DESIRED", Attr("desired_replicas")),
            ("READY", Attr("ready_replicas")),
            ("AGE", Attr("age")),
        ],
        Kind::Service => &[
            ("NAMESPACE", Namespace),
            ("TYPE", Status),
            ("CLUSTER-IP", Attr("cluster_ip")),
            ("PORTS", Attr("ports")),
            ("AGE", Attr("age")),
        ],
        Kind::Secret => &[
            ("NAMESPACE", Namespace),
            ("TYPE", Status),
            ("KEYS", Attr("keys")),
            ("AGE", Attr("age")),
        ],
        Kind::StorageClass => &[
            ("STATUS", Status),
            ("PROVISIONER", Attr("provisioner")),
            ("RECLAIM", Attr("reclaim_policy")),
            ("BINDING MODE", Attr("volume_binding_mode")),
            ("EXPANSION", Attr("allow_volume_expansion")),
            ("AGE", Attr("age")),
        ],
        Kind::PersistentVolume => &[
            ("STATUS", Status),
            ("CAPACITY", Attr("capacity")),
            ("ACCESS", Attr("access_modes")),
            ("RECLAIM", Attr("reclaim_policy")),
            ("CLASS", Attr("storage_class")),
            ("CLAIM", Attr("claim")),
        ],
        Kind::PersistentVolumeClaim => &[
            ("NAMESPACE", Namespace),
            ("STATUS", Status),
            ("VOLUME", Attr("volume_name")),
            ("CAPACITY", Attr("capacity")),
            ("CLASS", Attr("storage_class")),
            ("AGE", Attr("age")),
        ],
        Kind::CustomResourceDefinition => &[
            ("STATUS", Status),
            ("GROUP", Attr("group")),
            ("KIND", Attr("kind")),
            ("SCOPE", Attr("scope")),
            ("VERSIONS", Attr("versions")),
        ],
        Kind::ClusterRole => &[
            ("RULES", Attr("rules")),
            ("AGGREGATED", Attr("aggregated")),
            ("AGE", Attr("age")),
        ],
        Kind::ClusterRoleBinding => &[
            ("ROLE", Attr("role")),
            ("SUBJECTS", Attr("subjects")),
            ("AGE", Attr("age")),
        ],
        Kind::Event => &[
            ("TYPE", Status),
            ("REASON", Attr("reason")),
            ("OBJECT", Attr("object")),
            ("COUNT", Attr("count")),
            ("LAST SEEN", Attr("last_seen")),
            ("MESSAGE", Attr("message")),
        ],
    }
}

fn cell_value(record: &NormalizedRecord, column: Column) -> String {
    match column {
        Column::Name => record.name.clone(),
        Column::Namespace => record.namespace.clone(),
        Column::Status => record.status.clone(),
        Column::Attr(key) => record.attr_display(key),
    }
}

/// A titled table of text cells; one column may be colored as a status
pub struct RecordTable {
    title: String,
    header: Vec<&'static str>,
    rows: Vec<Vec<String>>,
    status_column: Option<usize>,
}

impl RecordTable {
    /// One row per record of a single kind
    pub fn records(title: impl Into<String>, kind: Kind, records: &[NormalizedRecord]) -> Self {
        let cols = columns(kind);
        let header = std::iter::once("NAME")
            .chain(cols.iter().map(|(h, _)| *h))
            .collect();
        let rows = records
            .iter()
            .map(|r| {
                std::iter::once(r.name.clone())
                    .chain(cols.iter().map(|(_, c)| cell_value(r, *c)))
                    .collect()
            })
            .collect();
        let status_column = cols
            .iter()
            .position(|(_, c)| *c == Column::Status)
            .map(|i| i + 1);

        Self {
            title: title.into(),
            header,
            rows,
            status_column,
        }
    }

    /// Records of mixed kinds, as returned by a search
    pub fn search_results(title: impl Into<String>, records: &[NormalizedRecord]) -> Self {
        let rows = records
            .iter()
            .map(|r| {
                vec![
                    r.kind.to_string(),
                    r.name.clone(),
                    r.namespace.clone(),
                    r.status.clone(),
                ]
            })
            .collect();

        Self {
            title: title.into(),
            header: vec!["KIND", "NAME", "NAMESPACE", "STATUS"],
            rows,
            status_column: Some(3),
        }
    }

    pub fn bindings(title: impl Into<String>, bindings: &[VolumeBinding]) -> Self {
        let rows = bindings
            .iter()
            .map(|b| {
                vec![
                    b.pvc_name.clone(),
                    b.pvc_namespace.clone(),
                    b.pvc_status.clone(),
                    b.pv_name.clone(),
                    b.pv_status.clone(),
                    b.capacity.clone(),
                    b.storage_class.clone(),
                ]
            })
            .collect();

        Self {
            title: title.into(),
            header: vec![
                "PVC",
                "NAMESPACE",
                "PVC STATUS",
                "PV",
                "PV STATUS",
                "CAPACITY",
                "CLASS",
            ],
            rows,
            status_column: Some(2),
        }
    }

    /// Usage rows; node usage has no namespace column
    pub fn usage(title: impl Into<String>, usage: &[UsageRecord], namespaced: bool) -> Self {
        let header = if namespaced {
            vec!["NAME", "NAMESPACE", "CPU (cores)", "MEMORY"]
        } else {
            vec!["NAME", "CPU (cores)", "MEMORY"]
        };
        let rows = usage
            .iter()
            .map(|u| {
                let mut row = vec![u.name.clone()];
                if namespaced {
                    row.push(u.namespace.clone());
                }
                row.push(u.cpu_display());
                row.push(u.memory_display());
                row
            })
            .collect();

        Self {
            title: title.into(),
            header,
            rows,
            status_column: None,
        }
    }

    /// Column widths fitted to the widest cell, capped
    pub fn widths(&self) -> Vec<usize> {
        self.header
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.width())
                    .chain(std::iter::once(h.width()))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }
}

impl StatefulWidget for RecordTable {
    type State = TableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused())
            .title(Span::styled(
                format!(" {} ({}) ", self.title, self.rows.len()),
                Theme::title(),
            ));

        if self.rows.is_empty() {
            Paragraph::new(Span::styled("No resources found", Theme::text_dim()))
                .alignment(Alignment::Center)
                .block(block)
                .render(area, buf);
            return;
        }

        let widths: Vec<Constraint> = self
            .widths()
            .into_iter()
            .map(|w| Constraint::Length(w as u16))
            .collect();

        let header = Row::new(
            self.header
                .iter()
                .map(|h| Cell::from(*h).style(Theme::table_header())),
        );

        let status_column = self.status_column;
        let rows = self.rows.into_iter().map(|row| {
            Row::new(row.into_iter().enumerate().map(|(i, cell)| {
                let style = if Some(i) == status_column {
                    Theme::status(&cell)
                } else {
                    Style::default()
                };
                Cell::from(cell).style(style)
            }))
        });

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(2)
            .row_highlight_style(Theme::list_item_selected())
            .highlight_symbol("▶ ");

        StatefulWidget::render(table, area, buf, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_columns() {
        for kind in Kind::SEARCHABLE {
            assert!(!columns(kind).is_empty(), "{} has no columns", kind);
        }
    }

    #[test]
    fn test_cluster_scoped_kinds_skip_namespace_column() {
        for kind in Kind::SEARCHABLE.into_iter().filter(|k| !k.is_namespaced()) {
            assert!(
                columns(kind).iter().all(|(_, c)| *c != Column::Namespace),
                "{} shows a namespace",
                kind
            );
        }
    }

    #[test]
    fn test_record_rows_fill_missing_attributes() {
        let pod = NormalizedRecord::new(Kind::Pod, "web-1", Some("default".into()), "Running")
            .with_attr("ready", "1/1");
        let table = RecordTable::records("Pods", Kind::Pod, &[pod]);

        assert_eq!(table.header[0], "NAME");
        assert_eq!(table.rows[0][0], "web-1");
        assert_eq!(table.rows[0][1], "default");
        assert_eq!(table.rows[0][3], "1/1");
        // restarts was never set
        assert_eq!(table.rows[0][4], "N/A");
        assert_eq!(table.status_column, Some(2));
    }

    #[test]
    fn test_widths_fit_content_and_header() {
        let pod = NormalizedRecord::new(Kind::Pod, "a-rather-long-pod-name", Some("ns".into()), "Running");
        let widths = RecordTable::records("Pods", Kind::Pod, &[pod]).widths();

        assert_eq!(widths[0], "a-rather-long-pod-name".len());
        assert_eq!(widths[1], "NAMESPACE".len());
    }

    #[test]
    fn test_usage_sentinel_row() {
        let table = RecordTable::usage("Top Nodes", &[UsageRecord::unavailable()], false);
        assert_eq!(table.rows, vec![vec!["N/A".to_string(), "N/A".to_string(), "N/A".to_string()]]);
    }
}
