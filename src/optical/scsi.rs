//! SG_IO SCSI transport for the one command this crate issues directly:
//! READ FORMAT CAPACITIES, used to get a DVD-RW's true capacity when the
//! backend only reports the currently formatted size (spec.md §9
//! supplemented feature 1).
//!
//! Field layout mirrors `linux/include/scsi/sg.h`.

use std::ffi::c_void;
use std::fs::OpenOptions;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use nix::ioctl_readwrite_bad;

const SG_IO: u64 = 0x2285;
const SG_INFO_OK_MASK: u32 = 0x1;
const SG_INFO_OK: u32 = 0x0;
const SG_FLAG_DIRECT_IO: u32 = 0x02;
const SG_DXFER_FROM_DEV: i32 = -3;
const CHECK_CONDITION: u8 = 0x01;

#[repr(C)]
struct SgIoHeader {
    interface_id: i32,
    dxfer_direction: i32,
    cmd_len: u8,
    mx_sb_len: u8,
    iovec_count: u16,
    dxfer_len: u32,
    dxferp: *mut c_void,
    cmdp: *mut u8,
    sbp: *mut u8,
    timeout: u32,
    flags: u32,
    pack_id: i32,
    usr_ptr: *mut c_void,
    status: u8,
    masked_status: u8,
    msg_status: u8,
    sb_len_wr: u8,
    host_status: u16,
    driver_status: u16,
    resid: i32,
    duration: u32,
    info: u32,
}

ioctl_readwrite_bad!(ioctl_sg_io, SG_IO, SgIoHeader);

/// Opens `dev` `O_RDWR|O_NONBLOCK` and issues a single READ FORMAT
/// CAPACITIES (opcode 0x23), returning the raw parameter data on success.
/// Mirrors `ScsiCommandHelper::transport` — a `CHECK CONDITION` status
/// with a zero sense error code is still treated as failure.
fn read_format_capacities(dev: &Path, alloc_len: u16) -> std::io::Result<[u8; 260]> {
    let file = OpenOptions::new().read(true).write(true).custom_flags(libc::O_NONBLOCK).open(dev)?;

    let mut cmd = [0u8; 10];
    cmd[0] = 0x23;
    cmd[7] = (alloc_len >> 8) as u8;
    cmd[8] = (alloc_len & 0xFF) as u8;

    let mut data = [0u8; 260];
    let mut sense = [0u8; 64];

    let mut header = SgIoHeader {
        interface_id: 'S' as i32,
        dxfer_direction: SG_DXFER_FROM_DEV,
        cmd_len: cmd.len() as u8,
        mx_sb_len: sense.len() as u8,
        iovec_count: 0,
        dxfer_len: alloc_len as u32,
        dxferp: data.as_mut_ptr() as *mut c_void,
        cmdp: cmd.as_mut_ptr(),
        sbp: sense.as_mut_ptr(),
        timeout: 10_000,
        flags: SG_FLAG_DIRECT_IO,
        pack_id: 0,
        usr_ptr: std::ptr::null_mut(),
        status: 0,
        masked_status: 0,
        msg_status: 0,
        sb_len_wr: 0,
        host_status: 0,
        driver_status: 0,
        resid: 0,
        duration: 0,
        info: 0,
    };

    unsafe { ioctl_sg_io(file.as_raw_fd(), &mut header) }?;

    let ok = header.info & SG_INFO_OK_MASK == SG_INFO_OK;
    let check_condition = header.masked_status & CHECK_CONDITION != 0;
    if !ok && (!check_condition || sense_error_code(&sense) == 0) {
        return Err(std::io::Error::new(std::io::ErrorKind::Other, "SG_IO command failed"));
    }

    Ok(data)
}

fn sense_error_code(sense: &[u8]) -> i32 {
    ((sense[2] as i32 & 0x0F) << 16) | ((sense[12] as i32) << 8) | sense[13] as i32
}

/// Two-phase probe: read the 12-byte capacity-list header to learn the
/// real parameter length, then re-read with that length (spec.md §9
/// supplemented feature 1, grounded on the original's
/// `acquireDVDRWCapacity`). Returns `0` on any inconsistency, matching
/// the original's "capacity stays at the formatted size" fallback.
pub fn probe_dvd_rw_capacity(dev: &Path) -> u64 {
    let Ok(header) = read_format_capacities(dev, 12) else {
        return 0;
    };

    let len = header[3] as usize;
    if len & 7 != 0 || len < 16 {
        return 0;
    }

    let Ok(formats) = read_format_capacities(dev, (4 + len) as u16) else {
        return 0;
    };

    if len != formats[3] as usize {
        return 0;
    }

    let i = 12;
    if i >= len {
        return 0;
    }

    let block_size = (u64::from(formats[9]) << 16) | (u64::from(formats[10]) << 8) | u64::from(formats[11]);
    let capacity_blocks = (u64::from(formats[i]) << 24)
        | (u64::from(formats[i + 1]) << 16)
        | (u64::from(formats[i + 2]) << 8)
        | u64::from(formats[i + 3]);

    block_size * capacity_blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sense_error_code_packs_three_fields() {
        let mut sense = [0u8; 64];
        sense[2] = 0x05;
        sense[12] = 0x21;
        sense[13] = 0x02;
        assert_eq!(sense_error_code(&sense), (0x05 << 16) | (0x21 << 8) | 0x02);
    }
}
