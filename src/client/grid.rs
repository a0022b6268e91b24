// src/client/grid.rs
//
// Tabela genérica do dashboard: ordenação, filtros e paginação em memória.
// O grid não executa ações; só devolve descritores de menu.

use std::{cmp::Ordering, collections::HashMap};

pub const DEFAULT_PAGE_SIZE: usize = 10;

// --- VALORES DE CÉLULA ---

/// Valor já formatado de uma célula. Renderização customizada = o acessor
/// devolver o `CellValue` que quiser.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        match value {
            Some(v) => CellValue::Text(v.to_string()),
            None => CellValue::Empty,
        }
    }

    /// Texto usado por filtros e pela busca global
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
        }
    }

    fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Empty, CellValue::Empty) => Ordering::Equal,
            (CellValue::Empty, _) => Ordering::Less,
            (_, CellValue::Empty) => Ordering::Greater,
            (CellValue::Number(a), CellValue::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (a, b) => a.display().to_lowercase().cmp(&b.display().to_lowercase()),
        }
    }
}

// --- COLUNAS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterConfig {
    Text,
    Number,
    Select { options: Vec<String> },
}

/// Item de menu declarativo. Quem chama despacha pelo `command`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub command: &'static str,
    pub label_key: &'static str,
    pub danger: bool,
    pub disabled: bool,
}

impl MenuOption {
    pub fn new(command: &'static str, label_key: &'static str) -> Self {
        Self {
            command,
            label_key,
            danger: false,
            disabled: false,
        }
    }

    pub fn danger(mut self) -> Self {
        self.danger = true;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

pub enum ColumnKind<R> {
    Data,
    Action(fn(&R) -> Vec<MenuOption>),
}

pub struct Column<R> {
    pub key: &'static str,
    pub label_key: &'static str,
    pub kind: ColumnKind<R>,
    pub sortable: bool,
    pub filter: Option<FilterConfig>,
    pub align: Align,
    pub value: fn(&R) -> CellValue,
}

fn no_value<R>(_: &R) -> CellValue {
    CellValue::Empty
}

impl<R> Column<R> {
    pub fn data(key: &'static str, label_key: &'static str, value: fn(&R) -> CellValue) -> Self {
        Self {
            key,
            label_key,
            kind: ColumnKind::Data,
            sortable: false,
            filter: None,
            align: Align::Left,
            value,
        }
    }

    /// Coluna de ações: o menu é uma função pura da linha
    pub fn action(key: &'static str, label_key: &'static str, menu: fn(&R) -> Vec<MenuOption>) -> Self {
        Self {
            key,
            label_key,
            kind: ColumnKind::Action(menu),
            sortable: false,
            filter: None,
            align: Align::Right,
            value: no_value::<R>,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    fn is_data(&self) -> bool {
        matches!(self.kind, ColumnKind::Data)
    }

    // Filtro vazio nunca chega aqui (é removido do estado)
    fn matches_filter(&self, row: &R, needle: &str) -> bool {
        let cell = (self.value)(row);
        match &self.filter {
            Some(FilterConfig::Text) | None => contains_ignore_case(&cell.display(), needle),
            Some(FilterConfig::Number) => match (needle.trim().parse::<f64>(), cell) {
                (Ok(wanted), CellValue::Number(n)) => n == wanted,
                (Ok(wanted), CellValue::Text(s)) => s.trim().parse::<f64>().map(|n| n == wanted).unwrap_or(false),
                _ => false,
            },
            Some(FilterConfig::Select { .. }) => cell.display() == needle,
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// --- ESTADO ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub key: &'static str,
    pub direction: SortDirection,
}

/// Estado da tabela. Não é persistido entre montagens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    pub page: usize,
    pub page_size: usize,
    pub sort: Option<SortState>,
    pub filters: HashMap<&'static str, String>,
    pub search: String,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort: None,
            filters: HashMap::new(),
            search: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub icon: &'static str,
    pub message_key: &'static str,
    pub cta: Option<MenuOption>,
}

/// Página calculada. `empty` só vem preenchido quando nada passou nos filtros.
#[derive(Debug)]
pub struct GridView<'a, R> {
    pub rows: Vec<&'a R>,
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
    pub empty: Option<&'a EmptyState>,
}

pub struct DataGrid<R> {
    columns: Vec<Column<R>>,
    rows: Vec<R>,
    state: GridState,
    empty_state: EmptyState,
    mass_actions: Vec<MenuOption>,
}

impl<R> DataGrid<R> {
    pub fn new(columns: Vec<Column<R>>, rows: Vec<R>, empty_state: EmptyState) -> Self {
        Self {
            columns,
            rows,
            state: GridState::default(),
            empty_state,
            mass_actions: Vec::new(),
        }
    }

    pub fn with_mass_actions(mut self, actions: Vec<MenuOption>) -> Self {
        self.mass_actions = actions;
        self
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    /// Dados novos depois de uma revalidação. Filtros e ordenação ficam.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        let page_count = self.page_count();
        self.state.page = self.state.page.clamp(1, page_count);
    }

    // =========================================================================
    //  AÇÕES QUE VOLTAM PARA A PÁGINA 1
    // =========================================================================

    /// Filtro em branco remove o filtro da coluna.
    pub fn set_filter(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.state.filters.remove(key);
        } else {
            self.state.filters.insert(key, value);
        }
        self.state.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.state.filters.clear();
        self.state.search.clear();
        self.state.page = 1;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.state.search = search.into();
        self.state.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.state.page_size = page_size.max(1);
        self.state.page = 1;
    }

    // =========================================================================
    //  NAVEGAÇÃO E ORDENAÇÃO
    // =========================================================================

    pub fn set_page(&mut self, page: usize) {
        self.state.page = page.clamp(1, self.page_count());
    }

    /// Sem ordenação → asc → desc → sem ordenação. Coluna não ordenável é ignorada.
    pub fn toggle_sort(&mut self, key: &'static str) {
        let sortable = self.columns.iter().any(|c| c.key == key && c.sortable && c.is_data());
        if !sortable {
            return;
        }

        self.state.sort = match self.state.sort.take() {
            Some(SortState { key: current, direction: SortDirection::Asc }) if current == key => Some(SortState {
                key,
                direction: SortDirection::Desc,
            }),
            Some(SortState { key: current, direction: SortDirection::Desc }) if current == key => None,
            _ => Some(SortState {
                key,
                direction: SortDirection::Asc,
            }),
        };
    }

    // =========================================================================
    //  CÁLCULO
    // =========================================================================

    fn matches(&self, row: &R) -> bool {
        for (key, needle) in &self.state.filters {
            let Some(column) = self.columns.iter().find(|c| c.key == *key) else {
                continue;
            };
            if !column.matches_filter(row, needle) {
                return false;
            }
        }

        let search = self.state.search.trim();
        if search.is_empty() {
            return true;
        }
        self.columns
            .iter()
            .filter(|c| c.is_data())
            .any(|c| contains_ignore_case(&(c.value)(row).display(), search))
    }

    /// Índices das linhas que passam nos filtros, já ordenados.
    /// Sem ordenação ativa, a ordem original é mantida.
    pub fn filtered_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.rows.len()).filter(|&i| self.matches(&self.rows[i])).collect();

        if let Some(sort) = &self.state.sort {
            if let Some(column) = self.columns.iter().find(|c| c.key == sort.key) {
                // sort_by é estável: empates mantêm a ordem original
                indices.sort_by(|&a, &b| {
                    let ord = (column.value)(&self.rows[a]).compare(&(column.value)(&self.rows[b]));
                    match sort.direction {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    }
                });
            }
        }

        indices
    }

    pub fn page_count(&self) -> usize {
        let total = self.filtered_indices().len();
        total.div_ceil(self.state.page_size).max(1)
    }

    pub fn view(&self) -> GridView<'_, R> {
        let indices = self.filtered_indices();
        let total = indices.len();
        let page_count = total.div_ceil(self.state.page_size).max(1);
        let page = self.state.page.clamp(1, page_count);

        let rows = indices
            .into_iter()
            .skip((page - 1) * self.state.page_size)
            .take(self.state.page_size)
            .map(|i| &self.rows[i])
            .collect();

        GridView {
            rows,
            total,
            page,
            page_count,
            empty: if total == 0 { Some(&self.empty_state) } else { None },
        }
    }

    /// Menu da linha (primeira coluna de ações). Sem coluna de ações, vazio.
    pub fn menu_for(&self, row: &R) -> Vec<MenuOption> {
        self.columns
            .iter()
            .find_map(|c| match c.kind {
                ColumnKind::Action(menu) => Some(menu(row)),
                ColumnKind::Data => None,
            })
            .unwrap_or_default()
    }

    /// Menu de ações em massa; desabilitado sem seleção.
    pub fn mass_actions(&self, selected: usize) -> Vec<MenuOption> {
        self.mass_actions
            .iter()
            .cloned()
            .map(|option| {
                let disabled = option.disabled || selected == 0;
                option.disabled(disabled)
            })
            .collect()
    }
}
