// src/services/reconciliation.rs
//
// Regras de ocupação sobre listas em memória (no máximo ~100 linhas).
// Nenhuma função aqui toca no banco: o serviço carrega as linhas, aplica a
// regra e grava só o que mudou, dentro da mesma transação.

use std::str::FromStr;

use chrono::Utc;
use rand::seq::IndexedRandom;
use thiserror::Error;
use uuid::Uuid;

use crate::models::occupancy::{Room, RoomStatus, StationStatus, StationType, WorkStation};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("estação {0} não encontrada")]
    StationNotFound(Uuid),
    #[error("estação {0} não está no status flex")]
    StationNotFlex(Uuid),
    #[error("nenhuma estação flex disponível")]
    NoFlexAvailable,
    #[error("estação {0} não está ocupada")]
    StationNotOccupied(Uuid),
}

/// Como escolher a estação que entra (ou sai) do pool flex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlexReplacementPolicy {
    /// Menor andar, depois menor número. Determinística.
    #[default]
    LowestPosition,
    Random,
}

impl FromStr for FlexReplacementPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lowest_position" | "lowest" => Ok(FlexReplacementPolicy::LowestPosition),
            "random" => Ok(FlexReplacementPolicy::Random),
            other => Err(anyhow::anyhow!("política de reposição flex desconhecida: {}", other)),
        }
    }
}

// "E1-9" -> ("E1-", Some(9)); números sem sufixo numérico vão para o fim do prefixo
fn number_key(number: &str) -> (&str, Option<u64>) {
    let prefix = number.trim_end_matches(|c: char| c.is_ascii_digit());
    let suffix = &number[prefix.len()..];
    (prefix, suffix.parse().ok())
}

fn position_cmp(a: &WorkStation, b: &WorkStation) -> std::cmp::Ordering {
    (a.floor, number_key(&a.number), &a.number).cmp(&(b.floor, number_key(&b.number), &b.number))
}

impl FlexReplacementPolicy {
    fn pick<'a>(&self, mut candidates: Vec<&'a WorkStation>) -> Option<&'a WorkStation> {
        match self {
            FlexReplacementPolicy::LowestPosition => {
                candidates.sort_by(|a, b| position_cmp(a, b));
                candidates.first().copied()
            }
            FlexReplacementPolicy::Random => candidates.choose(&mut rand::rng()).copied(),
        }
    }
}

/// Resultado de uma conversão flex -> fixa.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub stations: Vec<WorkStation>,
    pub converted: WorkStation,
    pub replacement: Option<WorkStation>,
}

impl Conversion {
    pub fn flex_pool_shrank(&self) -> bool {
        self.replacement.is_none()
    }

    /// Linhas que precisam ser gravadas.
    pub fn changed(&self) -> Vec<&WorkStation> {
        std::iter::once(&self.converted).chain(self.replacement.as_ref()).collect()
    }
}

/// Resultado de uma alocação ou liberação de uma única estação.
#[derive(Debug, Clone, PartialEq)]
pub struct StationChange {
    pub stations: Vec<WorkStation>,
    pub station: WorkStation,
}

fn position(stations: &[WorkStation], station_id: Uuid) -> Result<usize, RuleError> {
    stations
        .iter()
        .position(|s| s.id == station_id)
        .ok_or(RuleError::StationNotFound(station_id))
}

/// Converte uma estação flex em fixa para `client_id` e repõe o pool flex
/// promovendo uma estação `available`, se houver.
///
/// Se a estação não estiver em `flex`, nada muda e o erro é devolvido;
/// a lista de entrada é apenas emprestada.
pub fn convert_flex_to_fixed(
    stations: &[WorkStation],
    station_id: Uuid,
    client_id: Uuid,
    policy: FlexReplacementPolicy,
) -> Result<Conversion, RuleError> {
    let idx = position(stations, station_id)?;
    if stations[idx].status != StationStatus::Flex {
        return Err(RuleError::StationNotFlex(station_id));
    }

    let now = Utc::now();
    let mut next = stations.to_vec();

    {
        let target = &mut next[idx];
        target.status = StationStatus::Occupied;
        target.station_type = StationType::Fixed;
        target.client_id = Some(client_id);
        target.updated_at = now;
    }

    let candidates: Vec<&WorkStation> = stations
        .iter()
        .filter(|s| s.id != station_id && s.status == StationStatus::Available)
        .collect();
    let replacement_id = policy.pick(candidates).map(|s| s.id);

    let replacement = match replacement_id {
        Some(rid) => {
            let ridx = position(&next, rid)?;
            let promoted = &mut next[ridx];
            promoted.status = StationStatus::Flex;
            promoted.station_type = StationType::Flex;
            promoted.client_id = None;
            promoted.updated_at = now;
            Some(promoted.clone())
        }
        None => None,
    };

    Ok(Conversion {
        converted: next[idx].clone(),
        replacement,
        stations: next,
    })
}

/// Coloca um cliente em uma estação do pool flex.
pub fn allocate_flex(
    stations: &[WorkStation],
    client_id: Uuid,
    policy: FlexReplacementPolicy,
) -> Result<StationChange, RuleError> {
    let candidates: Vec<&WorkStation> = stations
        .iter()
        .filter(|s| s.status == StationStatus::Flex)
        .collect();
    let chosen = policy.pick(candidates).ok_or(RuleError::NoFlexAvailable)?.id;

    let mut next = stations.to_vec();
    let idx = position(&next, chosen)?;
    let station = &mut next[idx];
    station.status = StationStatus::Occupied;
    station.client_id = Some(client_id);
    station.updated_at = Utc::now();
    let station = station.clone();

    Ok(StationChange { stations: next, station })
}

/// Devolve uma estação ocupada ao seu pool: flex volta para `flex`,
/// fixa volta para `available`.
pub fn release_station(stations: &[WorkStation], station_id: Uuid) -> Result<StationChange, RuleError> {
    let idx = position(stations, station_id)?;
    if stations[idx].status != StationStatus::Occupied {
        return Err(RuleError::StationNotOccupied(station_id));
    }

    let mut next = stations.to_vec();
    let station = &mut next[idx];
    unlink_station_client(station);
    let station = station.clone();

    Ok(StationChange { stations: next, station })
}

// --- Regras de uma linha só (status e vínculo com cliente) ---

/// `available` nunca fica vinculada a um cliente.
pub fn apply_room_status(room: &mut Room, status: RoomStatus) {
    room.status = status;
    if status == RoomStatus::Available {
        room.client_id = None;
    }
    room.updated_at = Utc::now();
}

pub fn link_room_client(room: &mut Room, client_id: Uuid) {
    room.client_id = Some(client_id);
    if room.status == RoomStatus::Available {
        room.status = RoomStatus::Occupied;
    }
    room.updated_at = Utc::now();
}

pub fn unlink_room_client(room: &mut Room) {
    room.client_id = None;
    if room.status == RoomStatus::Occupied {
        room.status = RoomStatus::Available;
    }
    room.updated_at = Utc::now();
}

/// `available` e `flex` são pools livres: nenhum dos dois guarda cliente.
/// Mover a estação para um desses pools também troca o tipo, para que ela
/// volte ao mesmo pool quando for liberada.
pub fn apply_station_status(station: &mut WorkStation, status: StationStatus) {
    station.status = status;
    match status {
        StationStatus::Available => {
            station.client_id = None;
            station.station_type = StationType::Fixed;
        }
        StationStatus::Flex => {
            station.client_id = None;
            station.station_type = StationType::Flex;
        }
        _ => {}
    }
    station.updated_at = Utc::now();
}

pub fn link_station_client(station: &mut WorkStation, client_id: Uuid) {
    station.client_id = Some(client_id);
    if matches!(station.status, StationStatus::Available | StationStatus::Flex) {
        station.status = StationStatus::Occupied;
    }
    station.updated_at = Utc::now();
}

pub fn unlink_station_client(station: &mut WorkStation) {
    station.client_id = None;
    if station.status == StationStatus::Occupied {
        station.status = match station.station_type {
            StationType::Flex => StationStatus::Flex,
            StationType::Fixed => StationStatus::Available,
        };
    }
    station.updated_at = Utc::now();
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal::Decimal;

    fn station(number: &str, floor: i16, status: StationStatus) -> WorkStation {
        let now = Utc::now();
        let station_type = if status == StationStatus::Flex { StationType::Flex } else { StationType::Fixed };
        WorkStation {
            id: Uuid::new_v4(),
            floor,
            number: number.into(),
            station_type,
            status,
            client_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn count(stations: &[WorkStation], status: StationStatus) -> usize {
        stations.iter().filter(|s| s.status == status).count()
    }

    #[test]
    fn converting_non_flex_station_is_a_no_op() {
        let stations = vec![
            station("E-01", 1, StationStatus::Available),
            station("E-02", 1, StationStatus::Flex),
        ];
        let before = stations.clone();

        let result = convert_flex_to_fixed(&stations, stations[0].id, Uuid::new_v4(), FlexReplacementPolicy::LowestPosition);

        assert_eq!(result, Err(RuleError::StationNotFlex(stations[0].id)));
        assert_eq!(stations, before);
    }

    #[test]
    fn converting_unknown_station_reports_not_found() {
        let stations = vec![station("E-01", 1, StationStatus::Flex)];
        let missing = Uuid::new_v4();
        assert_matches!(
            convert_flex_to_fixed(&stations, missing, Uuid::new_v4(), FlexReplacementPolicy::Random),
            Err(RuleError::StationNotFound(id)) if id == missing
        );
    }

    #[test]
    fn conversion_promotes_exactly_one_available_station() {
        let stations = vec![
            station("E-01", 1, StationStatus::Flex),
            station("E-02", 1, StationStatus::Available),
            station("E-03", 2, StationStatus::Available),
            station("E-04", 2, StationStatus::Occupied),
        ];
        let client = Uuid::new_v4();

        let conversion = convert_flex_to_fixed(&stations, stations[0].id, client, FlexReplacementPolicy::Random).unwrap();

        assert_eq!(conversion.converted.status, StationStatus::Occupied);
        assert_eq!(conversion.converted.station_type, StationType::Fixed);
        assert_eq!(conversion.converted.client_id, Some(client));
        assert_eq!(count(&conversion.stations, StationStatus::Flex), 1);
        assert_eq!(count(&conversion.stations, StationStatus::Available), 1);
        assert!(!conversion.flex_pool_shrank());
        assert_eq!(conversion.changed().len(), 2);
    }

    #[test]
    fn conversion_without_available_station_shrinks_flex_pool() {
        let stations = vec![
            station("E-01", 1, StationStatus::Flex),
            station("E-02", 1, StationStatus::Flex),
            station("E-03", 1, StationStatus::Occupied),
        ];

        let conversion =
            convert_flex_to_fixed(&stations, stations[0].id, Uuid::new_v4(), FlexReplacementPolicy::LowestPosition).unwrap();

        assert_eq!(conversion.converted.status, StationStatus::Occupied);
        assert_eq!(count(&conversion.stations, StationStatus::Flex), 1);
        assert!(conversion.flex_pool_shrank());
        assert_eq!(conversion.changed().len(), 1);
    }

    #[test]
    fn five_station_scenario() {
        // 1 flex, 2 livres, 2 ocupadas
        let stations = vec![
            station("A-01", 1, StationStatus::Occupied),
            station("A-02", 1, StationStatus::Flex),
            station("A-03", 1, StationStatus::Available),
            station("A-04", 2, StationStatus::Available),
            station("A-05", 2, StationStatus::Occupied),
        ];
        let c1 = Uuid::new_v4();
        let flex_id = stations[1].id;
        let available_ids = [stations[2].id, stations[3].id];

        let conversion = convert_flex_to_fixed(&stations, flex_id, c1, FlexReplacementPolicy::LowestPosition).unwrap();
        let after = &conversion.stations;

        assert_eq!(after.len(), 5);
        let former_flex = after.iter().find(|s| s.id == flex_id).unwrap();
        assert_eq!(former_flex.status, StationStatus::Occupied);
        assert_eq!(former_flex.client_id, Some(c1));

        let statuses: Vec<StationStatus> = available_ids
            .iter()
            .map(|id| after.iter().find(|s| s.id == *id).unwrap().status)
            .collect();
        assert_eq!(statuses.iter().filter(|s| **s == StationStatus::Flex).count(), 1);
        assert_eq!(statuses.iter().filter(|s| **s == StationStatus::Available).count(), 1);

        // Menor posição: A-03 (1º andar) é a promovida
        assert_eq!(conversion.replacement.as_ref().map(|s| s.id), Some(available_ids[0]));
    }

    #[test]
    fn allocate_flex_picks_a_flex_seat_and_keeps_its_type() {
        let stations = vec![
            station("B-02", 2, StationStatus::Flex),
            station("B-01", 1, StationStatus::Flex),
            station("B-03", 1, StationStatus::Available),
        ];
        let client = Uuid::new_v4();

        let change = allocate_flex(&stations, client, FlexReplacementPolicy::LowestPosition).unwrap();

        assert_eq!(change.station.id, stations[1].id);
        assert_eq!(change.station.status, StationStatus::Occupied);
        assert_eq!(change.station.station_type, StationType::Flex);
        assert_eq!(change.station.client_id, Some(client));
        assert_eq!(count(&change.stations, StationStatus::Flex), 1);
    }

    #[test]
    fn allocate_flex_fails_when_pool_is_empty() {
        let stations = vec![station("B-01", 1, StationStatus::Available)];
        assert_eq!(
            allocate_flex(&stations, Uuid::new_v4(), FlexReplacementPolicy::Random),
            Err(RuleError::NoFlexAvailable)
        );
    }

    #[test]
    fn release_returns_station_to_its_pool() {
        let stations = vec![
            station("C-01", 1, StationStatus::Flex),
            station("C-02", 1, StationStatus::Available),
        ];
        let allocated = allocate_flex(&stations, Uuid::new_v4(), FlexReplacementPolicy::LowestPosition).unwrap();

        let released = release_station(&allocated.stations, allocated.station.id).unwrap();
        assert_eq!(released.station.status, StationStatus::Flex);
        assert_eq!(released.station.client_id, None);

        let mut fixed = station("C-03", 1, StationStatus::Occupied);
        fixed.client_id = Some(Uuid::new_v4());
        let released = release_station(std::slice::from_ref(&fixed), fixed.id).unwrap();
        assert_eq!(released.station.status, StationStatus::Available);
        assert_eq!(released.station.client_id, None);
    }

    #[test]
    fn release_rejects_station_that_is_not_occupied() {
        let stations = vec![station("C-01", 1, StationStatus::Available)];
        assert_eq!(
            release_station(&stations, stations[0].id),
            Err(RuleError::StationNotOccupied(stations[0].id))
        );
    }

    fn room(status: RoomStatus, client_id: Option<Uuid>) -> Room {
        let now = Utc::now();
        Room {
            id: Uuid::new_v4(),
            floor: 1,
            number: "101".into(),
            status,
            client_id,
            area: Decimal::from(20),
            capacity: 4,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn setting_room_available_always_clears_client() {
        for prior in [RoomStatus::Occupied, RoomStatus::Reserved, RoomStatus::Maintenance, RoomStatus::Available] {
            let mut r = room(prior, Some(Uuid::new_v4()));
            apply_room_status(&mut r, RoomStatus::Available);
            assert_eq!(r.status, RoomStatus::Available);
            assert_eq!(r.client_id, None);
        }

        let client = Uuid::new_v4();
        let mut r = room(RoomStatus::Occupied, Some(client));
        apply_room_status(&mut r, RoomStatus::Reserved);
        assert_eq!(r.client_id, Some(client));
    }

    #[test]
    fn linking_and_unlinking_room_moves_between_available_and_occupied() {
        let client = Uuid::new_v4();
        let mut r = room(RoomStatus::Available, None);

        link_room_client(&mut r, client);
        assert_eq!((r.status, r.client_id), (RoomStatus::Occupied, Some(client)));

        unlink_room_client(&mut r);
        assert_eq!((r.status, r.client_id), (RoomStatus::Available, None));

        // Sala reservada continua reservada ao ganhar um cliente
        let mut reserved = room(RoomStatus::Reserved, None);
        link_room_client(&mut reserved, client);
        assert_eq!(reserved.status, RoomStatus::Reserved);
    }

    #[test]
    fn station_status_flex_or_available_clears_client() {
        let mut s = station("D-01", 1, StationStatus::Occupied);
        s.client_id = Some(Uuid::new_v4());
        apply_station_status(&mut s, StationStatus::Flex);
        assert_eq!(s.client_id, None);

        link_station_client(&mut s, Uuid::new_v4());
        assert_eq!(s.status, StationStatus::Occupied);
        apply_station_status(&mut s, StationStatus::Maintenance);
        assert!(s.client_id.is_some());
    }

    #[test]
    fn status_change_keeps_flex_pool_size_through_allocate_and_release() {
        let mut stations = vec![
            station("D-01", 1, StationStatus::Available),
            station("D-02", 1, StationStatus::Available),
        ];
        let promoted = stations[0].id;

        apply_station_status(&mut stations[0], StationStatus::Flex);
        assert_eq!(stations[0].station_type, StationType::Flex);
        assert_eq!(count(&stations, StationStatus::Flex), 1);

        let allocated = allocate_flex(&stations, Uuid::new_v4(), FlexReplacementPolicy::LowestPosition).unwrap();
        assert_eq!(allocated.station.id, promoted);
        assert_eq!(count(&allocated.stations, StationStatus::Flex), 0);

        let released = release_station(&allocated.stations, promoted).unwrap();
        assert_eq!(released.station.status, StationStatus::Flex);
        assert_eq!(count(&released.stations, StationStatus::Flex), 1);
    }

    #[test]
    fn flex_station_set_available_leaves_the_flex_pool() {
        let mut s = station("D-03", 1, StationStatus::Flex);
        apply_station_status(&mut s, StationStatus::Available);
        assert_eq!(s.station_type, StationType::Fixed);

        link_station_client(&mut s, Uuid::new_v4());
        unlink_station_client(&mut s);
        assert_eq!(s.status, StationStatus::Available);
    }

    #[test]
    fn lowest_position_compares_numeric_suffix() {
        let stations = vec![
            station("E1-10", 1, StationStatus::Flex),
            station("E1-9", 1, StationStatus::Flex),
        ];

        let change = allocate_flex(&stations, Uuid::new_v4(), FlexReplacementPolicy::LowestPosition).unwrap();
        assert_eq!(change.station.number, "E1-9");
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!("random".parse::<FlexReplacementPolicy>().unwrap(), FlexReplacementPolicy::Random);
        assert_eq!(" Lowest_Position ".parse::<FlexReplacementPolicy>().unwrap(), FlexReplacementPolicy::LowestPosition);
        assert!("fifo".parse::<FlexReplacementPolicy>().is_err());
    }
}
