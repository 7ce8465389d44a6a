//! 建议服务：加载记录、串联规则、写回存储。
//!
//! 每个入口都先按所有者加载水族箱，水族箱不存在即返回 `NotFound`，
//! 因此后续按水族箱访问的存储无需再做所有者过滤。

use crate::clock::{Clock, SystemClock};
use crate::compatibility::check_compatibility;
use crate::cycle::{CycleReport, CycleSignals, predict_cycle_status};
use crate::device_config::build_device_config;
use crate::economy::{EconomyReport, EconomyRequest, calculate_monthly_cost};
use crate::stocking::{StockingEstimate, calculate_stocking};
use crate::targets::{TargetRecalculation, derive_targets};
use crate::tasks::{TaskSignals, plan_tasks};
use crate::trend::{TrendReport, analyze_trend};
use crate::{AdvisorError, AdvisorRules, StockedSpecies};
use aqua_storage::{
    AquariumStores, SensorMeasurementRecord, TankRecord, TankTargets, TankTargetsUpdate,
    TaskRecord,
};
use aqua_telemetry::{
    record_compatibility_check, record_device_config_written, record_livestock_added,
    record_livestock_rejected, record_target_recalculation, record_tasks_created,
};
use domain::{OwnerContext, SensorParameter, days_between};
use std::sync::Arc;
use tracing::{info, warn};

const WATER_CHANGE_KEYWORD: &str = "water_change";
const FILTER_KEYWORD: &str = "filter";

/// 放养请求的结果。
///
/// 有警告且未忽略时 `added` 为 `false`，水族箱保持不变。
#[derive(Debug, Clone)]
pub struct AddLivestockOutcome {
    pub added: bool,
    pub warnings: Vec<String>,
    pub stocking: StockingEstimate,
    pub targets: Option<TargetRecalculation>,
    pub device_config: Option<serde_json::Value>,
}

/// 全量诊断结果。
#[derive(Debug, Clone)]
pub struct DiagnosticsReport {
    pub warnings: Vec<String>,
    pub stocking: StockingEstimate,
    pub targets: Option<TargetRecalculation>,
    pub device_config: Option<serde_json::Value>,
    pub cycle: CycleReport,
    pub ph_trend: TrendReport,
    pub temperature_trend: TrendReport,
}

#[derive(Clone)]
pub struct AdvisorService {
    stores: AquariumStores,
    rules: AdvisorRules,
    clock: Arc<dyn Clock>,
}

impl AdvisorService {
    pub fn new(stores: AquariumStores, rules: AdvisorRules) -> Self {
        Self {
            stores,
            rules,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn rules(&self) -> &AdvisorRules {
        &self.rules
    }

    pub fn stores(&self) -> &AquariumStores {
        &self.stores
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// 加入物种：兼容性 → 提交 → 生物负载 → 目标重算 → 设备配置。
    pub async fn add_livestock(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        species_id: &str,
        quantity: u32,
        ignore_warnings: bool,
    ) -> Result<AddLivestockOutcome, AdvisorError> {
        if quantity == 0 {
            return Err(AdvisorError::Validation(
                "quantity must be at least 1".to_string(),
            ));
        }
        let tank = self.load_tank(ctx, tank_id).await?;
        let candidate = self
            .stores
            .species
            .find_species(ctx, species_id)
            .await?
            .ok_or(AdvisorError::NotFound("species"))?;
        let current = self.stocked_species(ctx, tank_id).await?;
        let before = calculate_stocking(&tank, &current, &self.rules)?;

        let warnings = check_compatibility(&tank, &current, &candidate, quantity);
        record_compatibility_check(warnings.len());
        if !warnings.is_empty() && !ignore_warnings {
            record_livestock_rejected();
            info!(
                target: "aqua.advisor",
                tank_id = %tank_id,
                species_id = %species_id,
                quantity,
                warnings = warnings.len(),
                "livestock_rejected"
            );
            return Ok(AddLivestockOutcome {
                added: false,
                warnings,
                stocking: before,
                targets: None,
                device_config: None,
            });
        }

        let record = self
            .stores
            .stocking
            .add_stocking(ctx, tank_id, species_id, quantity, self.now_ms())
            .await?;
        record_livestock_added();
        info!(
            target: "aqua.advisor",
            tank_id = %tank_id,
            species_id = %species_id,
            quantity,
            total_quantity = record.quantity,
            warnings = warnings.len(),
            "livestock_added"
        );

        let stocked = self.stocked_species(ctx, tank_id).await?;
        let stocking = calculate_stocking(&tank, &stocked, &self.rules)?;
        let (tank, targets) = self.apply_targets(ctx, tank, &stocked).await?;
        let device_config = self.write_device_config(ctx, &tank, &stocked).await?;
        Ok(AddLivestockOutcome {
            added: true,
            warnings,
            stocking,
            targets,
            device_config,
        })
    }

    /// 重放兼容性检查并刷新目标、设备配置，附带氮循环与趋势。
    ///
    /// 兼容性按加入顺序重放：每个物种只与先于它加入的物种比较。
    pub async fn run_diagnostics(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<DiagnosticsReport, AdvisorError> {
        let tank = self.load_tank(ctx, tank_id).await?;
        let stocked = self.stocked_species(ctx, tank_id).await?;

        let mut warnings = Vec::new();
        for (index, item) in stocked.iter().enumerate() {
            warnings.extend(check_compatibility(
                &tank,
                &stocked[..index],
                &item.species,
                item.quantity,
            ));
        }
        record_compatibility_check(warnings.len());

        let stocking = calculate_stocking(&tank, &stocked, &self.rules)?;
        let (tank, targets) = self.apply_targets(ctx, tank, &stocked).await?;
        let device_config = self.write_device_config(ctx, &tank, &stocked).await?;
        let cycle = self.cycle_for(ctx, &tank).await?;
        let window = self.rules.trend_window;
        let ph_trend = self.trend_for(ctx, &tank, SensorParameter::Ph, window).await?;
        let temperature_trend = self
            .trend_for(ctx, &tank, SensorParameter::Temperature, window)
            .await?;

        info!(
            target: "aqua.advisor",
            tank_id = %tank_id,
            warnings = warnings.len(),
            percent = stocking.percent,
            cycle = cycle.status,
            "diagnostics_completed"
        );
        Ok(DiagnosticsReport {
            warnings,
            stocking,
            targets,
            device_config,
            cycle,
            ph_trend,
            temperature_trend,
        })
    }

    /// 当前生物负载。
    pub async fn stocking_estimate(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<StockingEstimate, AdvisorError> {
        let tank = self.load_tank(ctx, tank_id).await?;
        let stocked = self.stocked_species(ctx, tank_id).await?;
        calculate_stocking(&tank, &stocked, &self.rules)
    }

    /// 由放养重算目标区间；放养为空时返回 `None`。
    ///
    /// `auto_targets` 关闭时只计算不保存（`applied = false`）。
    pub async fn recalculate_targets(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Option<TargetRecalculation>, AdvisorError> {
        let tank = self.load_tank(ctx, tank_id).await?;
        let stocked = self.stocked_species(ctx, tank_id).await?;
        let (_, targets) = self.apply_targets(ctx, tank, &stocked).await?;
        Ok(targets)
    }

    /// 手动设置目标；同时关闭 `auto_targets`。
    pub async fn set_manual_targets(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        mut update: TankTargetsUpdate,
    ) -> Result<TankRecord, AdvisorError> {
        let tank = self.load_tank(ctx, tank_id).await?;
        let mut merged = tank.targets.clone();
        update.apply_to(&mut merged);
        ensure_ordered_targets(&merged)?;

        update.auto_targets = false;
        let updated = self
            .stores
            .tanks
            .update_targets(ctx, tank_id, update)
            .await?
            .ok_or(AdvisorError::NotFound("tank"))?;
        info!(target: "aqua.advisor", tank_id = %tank_id, "targets_set_manually");
        Ok(updated)
    }

    /// 重新打开 `auto_targets` 并立即重算。
    pub async fn enable_auto_targets(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<(TankRecord, Option<TargetRecalculation>), AdvisorError> {
        self.load_tank(ctx, tank_id).await?;
        let update = TankTargetsUpdate {
            auto_targets: true,
            ..TankTargetsUpdate::default()
        };
        let tank = self
            .stores
            .tanks
            .update_targets(ctx, tank_id, update)
            .await?
            .ok_or(AdvisorError::NotFound("tank"))?;
        let stocked = self.stocked_species(ctx, tank_id).await?;
        self.apply_targets(ctx, tank, &stocked).await
    }

    /// 重新生成设备配置；没有绑定设备时返回 `None` 且不写入任何记录。
    pub async fn refresh_device_config(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Option<serde_json::Value>, AdvisorError> {
        let tank = self.load_tank(ctx, tank_id).await?;
        let stocked = self.stocked_species(ctx, tank_id).await?;
        self.write_device_config(ctx, &tank, &stocked).await
    }

    pub async fn cycle_status(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<CycleReport, AdvisorError> {
        let tank = self.load_tank(ctx, tank_id).await?;
        self.cycle_for(ctx, &tank).await
    }

    /// 分析水族箱所有设备上报的参数趋势；`window` 缺省取规则表的值，
    /// 必须在 `1..=max_trend_window` 内。
    pub async fn analyze_trend(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        parameter: SensorParameter,
        window: Option<usize>,
    ) -> Result<TrendReport, AdvisorError> {
        let window = window.unwrap_or(self.rules.trend_window);
        if !(1..=self.rules.max_trend_window).contains(&window) {
            return Err(AdvisorError::Validation(format!(
                "window must be 1-{}",
                self.rules.max_trend_window
            )));
        }
        let tank = self.load_tank(ctx, tank_id).await?;
        self.trend_for(ctx, &tank, parameter, window).await
    }

    /// 生成到期的维护任务，返回本次新建的数量。
    ///
    /// 同一水族箱同名的活跃任务已存在时跳过，重复调用不会重复创建。
    pub async fn generate_tasks(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<usize, AdvisorError> {
        let tank = self.load_tank(ctx, tank_id).await?;
        let stocked = self.stocked_species(ctx, tank_id).await?;
        let stocking = calculate_stocking(&tank, &stocked, &self.rules)?;
        let now_ms = self.now_ms();

        let current_tds = self
            .recent_tank_sensor(ctx, tank_id, Some(SensorParameter::Tds), 1)
            .await?
            .first()
            .and_then(|reading| reading.tds)
            .unwrap_or(0.0);
        let signals = TaskSignals {
            days_since_water_change: self
                .days_since_activity(ctx, &tank, WATER_CHANGE_KEYWORD, now_ms)
                .await?,
            days_since_filter_clean: self
                .days_since_activity(ctx, &tank, FILTER_KEYWORD, now_ms)
                .await?,
            bioload_percent: stocking.percent,
            current_tds,
            max_tds: tank.targets.tds_max.unwrap_or(self.rules.default_max_tds),
        };

        let mut created = 0;
        for planned in plan_tasks(&signals, &self.rules) {
            if self
                .stores
                .tasks
                .find_active_task(ctx, tank_id, planned.title)
                .await?
                .is_some()
            {
                continue;
            }
            let record = TaskRecord {
                task_id: uuid::Uuid::new_v4().to_string(),
                owner_id: tank.owner_id.clone(),
                tank_id: tank_id.to_string(),
                title: planned.title.to_string(),
                description: Some(planned.description),
                start_date_ms: now_ms,
                recurrence: None,
                is_active: true,
            };
            self.stores.tasks.create_task(ctx, record).await?;
            created += 1;
        }

        record_tasks_created(created);
        info!(
            target: "aqua.advisor",
            tank_id = %tank_id,
            days_since_water_change = signals.days_since_water_change,
            days_since_filter_clean = signals.days_since_filter_clean,
            bioload_percent = signals.bioload_percent,
            current_tds = signals.current_tds,
            tasks_created = created,
            "maintenance_tasks_generated"
        );
        Ok(created)
    }

    /// 月度运行成本，电费按水族箱上所有设备的功率合计。
    pub async fn monthly_cost(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        request: &EconomyRequest,
    ) -> Result<EconomyReport, AdvisorError> {
        let tank = self.load_tank(ctx, tank_id).await?;
        let watts: Vec<Option<f64>> = self
            .stores
            .devices
            .list_by_tank(ctx, tank_id)
            .await?
            .into_iter()
            .map(|device| device.power_watts)
            .collect();
        calculate_monthly_cost(tank.volume_l, &watts, request, &self.rules)
    }

    /// 放养列表及对应物种（按加入顺序）。目录中已不存在的物种被跳过。
    pub async fn stocked_species(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Vec<StockedSpecies>, AdvisorError> {
        let rows = self.stores.stocking.list_stocking(ctx, tank_id).await?;
        let mut stocked = Vec::with_capacity(rows.len());
        for row in rows {
            match self.stores.species.find_species(ctx, &row.species_id).await? {
                Some(species) => stocked.push(StockedSpecies {
                    species,
                    quantity: row.quantity,
                }),
                None => warn!(
                    target: "aqua.advisor",
                    tank_id = %tank_id,
                    species_id = %row.species_id,
                    "stocked_species_missing_from_catalog"
                ),
            }
        }
        Ok(stocked)
    }

    async fn load_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<TankRecord, AdvisorError> {
        self.stores
            .tanks
            .find_tank(ctx, tank_id)
            .await?
            .ok_or(AdvisorError::NotFound("tank"))
    }

    async fn apply_targets(
        &self,
        ctx: &OwnerContext,
        tank: TankRecord,
        stocked: &[StockedSpecies],
    ) -> Result<(TankRecord, Option<TargetRecalculation>), AdvisorError> {
        let Some(mut recalculation) = derive_targets(stocked, &self.rules) else {
            return Ok((tank, None));
        };
        record_target_recalculation(recalculation.conflicts.len());
        if !recalculation.conflicts.is_empty() {
            warn!(
                target: "aqua.advisor",
                tank_id = %tank.tank_id,
                conflicts = ?recalculation.conflicts,
                temp_min = recalculation.temp_min,
                temp_max = recalculation.temp_max,
                ph_min = recalculation.ph_min,
                ph_max = recalculation.ph_max,
                "target_range_conflict"
            );
        }
        if !tank.auto_targets {
            return Ok((tank, Some(recalculation)));
        }

        let update = TankTargetsUpdate {
            auto_targets: true,
            temp_min: Some(recalculation.temp_min),
            temp_max: Some(recalculation.temp_max),
            ph_min: Some(recalculation.ph_min),
            ph_max: Some(recalculation.ph_max),
            ..TankTargetsUpdate::default()
        };
        let updated = self
            .stores
            .tanks
            .update_targets(ctx, &tank.tank_id, update)
            .await?
            .ok_or(AdvisorError::NotFound("tank"))?;
        recalculation.applied = true;
        info!(
            target: "aqua.advisor",
            tank_id = %updated.tank_id,
            temp_min = recalculation.temp_min,
            temp_max = recalculation.temp_max,
            ph_min = recalculation.ph_min,
            ph_max = recalculation.ph_max,
            "targets_recalculated"
        );
        Ok((updated, Some(recalculation)))
    }

    async fn write_device_config(
        &self,
        ctx: &OwnerContext,
        tank: &TankRecord,
        stocked: &[StockedSpecies],
    ) -> Result<Option<serde_json::Value>, AdvisorError> {
        let Some(device) = self.stores.devices.find_by_tank(ctx, &tank.tank_id).await? else {
            return Ok(None);
        };
        let config = build_device_config(tank, stocked, &device.config, self.now_ms(), &self.rules);
        let updated = self
            .stores
            .devices
            .update_config(ctx, &device.device_id, config)
            .await?
            .ok_or(AdvisorError::NotFound("device"))?;
        record_device_config_written();
        info!(
            target: "aqua.advisor",
            tank_id = %tank.tank_id,
            device_id = %updated.device_id,
            "device_config_written"
        );
        Ok(Some(updated.config))
    }

    async fn cycle_for(
        &self,
        ctx: &OwnerContext,
        tank: &TankRecord,
    ) -> Result<CycleReport, AdvisorError> {
        let now_ms = self.now_ms();
        let latest = self
            .stores
            .measurements
            .recent_manual(ctx, &tank.tank_id, 1)
            .await?;
        let days_since_start = tank.start_date_ms.map(|start| days_between(start, now_ms));
        let signals = CycleSignals::new(days_since_start, latest.first());
        Ok(predict_cycle_status(&signals, &self.rules))
    }

    async fn trend_for(
        &self,
        ctx: &OwnerContext,
        tank: &TankRecord,
        parameter: SensorParameter,
        window: usize,
    ) -> Result<TrendReport, AdvisorError> {
        let readings = self
            .recent_tank_sensor(ctx, &tank.tank_id, Some(parameter), window)
            .await?;
        Ok(analyze_trend(parameter, &readings, window, &self.rules))
    }

    /// 合并水族箱所有设备的读数，按时间倒序取前 `limit` 条。
    async fn recent_tank_sensor(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        parameter: Option<SensorParameter>,
        limit: usize,
    ) -> Result<Vec<SensorMeasurementRecord>, AdvisorError> {
        let devices = self.stores.devices.list_by_tank(ctx, tank_id).await?;
        let mut readings = Vec::new();
        for device in devices {
            readings.extend(
                self.stores
                    .measurements
                    .recent_sensor(ctx, &device.device_id, parameter, limit)
                    .await?,
            );
        }
        readings.sort_by(|a, b| b.ts_ms.cmp(&a.ts_ms));
        readings.truncate(limit);
        Ok(readings)
    }

    /// 距最近一次匹配活动的天数；没有活动时按开缸日计算，都没有则取规则表的缺省值。
    async fn days_since_activity(
        &self,
        ctx: &OwnerContext,
        tank: &TankRecord,
        keyword: &str,
        now_ms: i64,
    ) -> Result<i64, AdvisorError> {
        let latest = self
            .stores
            .activity
            .latest_activity(ctx, &tank.tank_id, keyword)
            .await?;
        let days = match (latest, tank.start_date_ms) {
            (Some(activity), _) => days_between(activity.ts_ms, now_ms),
            (None, Some(start)) => days_between(start, now_ms),
            (None, None) => self.rules.missing_activity_days,
        };
        Ok(days)
    }
}

fn ensure_ordered_targets(targets: &TankTargets) -> Result<(), AdvisorError> {
    let pairs = [
        ("temperature", targets.temp_min, targets.temp_max),
        ("pH", targets.ph_min, targets.ph_max),
        ("TDS", targets.tds_min, targets.tds_max),
        ("GH", targets.gh_min, targets.gh_max),
        ("KH", targets.kh_min, targets.kh_max),
    ];
    for (name, min, max) in pairs {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(AdvisorError::Validation(format!(
                    "{name} minimum must not exceed maximum"
                )));
            }
        }
    }
    Ok(())
}
